use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[cfg(test)]
use mockall::{automock};

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
pub struct DailyClose {
    pub date : NaiveDate,
    pub close : f64
}

#[derive(Debug, PartialEq, Clone, Deserialize, Serialize)]
pub struct HistoryMetadata {
    pub symbol : String,
    pub from_date : NaiveDate,
    pub to_date : NaiveDate
}

#[cfg_attr(test, automock)]
pub trait MarketDataService {
    fn fetch_daily_closes(&mut self, symbol : &str, since_date : &NaiveDate,
        to_date : &NaiveDate) -> anyhow::Result<(Vec<DailyClose>, HistoryMetadata)>;
}
