use chrono::NaiveDate;
use serde::Deserialize;
use forecast_lib::{DailyClose, ForecastError, HistoryMetadata, MarketDataService};

static YAHOO_API_HOST : &str = "https://query1.finance.yahoo.com";

#[derive(Deserialize, Debug)]
struct ChartResponse {
    chart : Chart
}

#[derive(Deserialize, Debug)]
struct Chart {
    result : Option<Vec<ChartResult>>
}

#[derive(Deserialize, Debug)]
struct ChartResult {
    timestamp : Option<Vec<i64>>,
    indicators : Indicators
}

#[derive(Deserialize, Debug)]
struct Indicators {
    quote : Vec<Quote>
}

#[derive(Deserialize, Debug)]
struct Quote {
    close : Vec<Option<f64>>
}

pub struct YahooMarketService {
    client : reqwest::blocking::Client
}

impl YahooMarketService {
    pub fn create() -> anyhow::Result<YahooMarketService> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("forecast-app/0.1")
            .build()?;
        Ok(YahooMarketService { client })
    }

    fn history_from_response(response : ChartResponse, symbol : &str) -> anyhow::Result<Vec<DailyClose>> {
        let result = response.chart.result
            .and_then(|mut results| if results.is_empty() { None } else { Some(results.remove(0)) })
            .ok_or_else(|| ForecastError::DataFetch(format!("no chart data returned for '{}'", symbol)))?;

        let timestamps = result.timestamp.unwrap_or_default();
        let quote = result.indicators.quote.into_iter().next()
            .ok_or_else(|| ForecastError::DataFetch(format!("no quote data returned for '{}'", symbol)))?;

        // Days the exchange was closed come back as null closes and are skipped.
        let mut history = Vec::new();
        for (timestamp, maybe_close) in timestamps.iter().zip(quote.close.iter()) {
            if let Some(close) = maybe_close {
                if let Some(date_time) = chrono::DateTime::from_timestamp(*timestamp, 0) {
                    history.push(DailyClose { date : date_time.date_naive(), close : *close });
                }
            }
        }

        Ok(history)
    }
}

impl MarketDataService for YahooMarketService {
    fn fetch_daily_closes(&mut self, symbol : &str, since_date : &NaiveDate,
            to_date : &NaiveDate) -> anyhow::Result<(Vec<DailyClose>, HistoryMetadata)> {
        let period1 = since_date.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp();
        let period2 = to_date.and_hms_opt(23, 59, 59).unwrap().and_utc().timestamp();
        let url = format!("{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            YAHOO_API_HOST, symbol, period1, period2);

        let response = self.client.get(&url).send()
            .map_err(|e| ForecastError::DataFetch(format!("request for '{}' failed: {}", symbol, e)))?;
        if !response.status().is_success() {
            return Err(ForecastError::DataFetch(
                format!("provider returned {} for '{}'", response.status(), symbol)).into());
        }

        let payload : ChartResponse = response.json()
            .map_err(|e| ForecastError::DataFetch(format!("unexpected payload for '{}': {}", symbol, e)))?;

        let history = YahooMarketService::history_from_response(payload, symbol)?;
        if history.is_empty() {
            return Err(ForecastError::DataFetch(
                format!("provider returned an empty series for '{}'", symbol)).into());
        }

        let history_metadata = HistoryMetadata { symbol : String::from(symbol),
            from_date : *since_date, to_date : *to_date };
        Ok((history, history_metadata))
    }
}
