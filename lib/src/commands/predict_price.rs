use crate::forecast_model::*;
use crate::market_data::*;
use crate::plotter::*;
use crate::hyperparams::{self, HorizonPolicy};
use crate::utils;
use anyhow::anyhow;
use chrono::NaiveDate;
use getset::{Setters};
use serde::Serialize;

#[derive(Debug, PartialEq, Serialize)]
pub struct PriceForecast {
    pub predicted_price : f64,
    pub graph_path : String,
    pub accuracy : f64
}

#[derive(Debug, Setters)]
#[getset(set = "pub")]
pub struct ForecastOptions {
    pub horizon_policy : HorizonPolicy,
    pub history_start : NaiveDate,
    pub graph_dir : String
}

impl Default for ForecastOptions {
    fn default() -> Self {
        ForecastOptions { horizon_policy : HorizonPolicy::Reject,
            history_start : NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            graph_dir : String::from("graphs") }
    }
}

pub fn predict_price<T : ForecastModel>(service : &mut impl MarketDataService,
                     model : &mut T,
                     plotter : &mut impl Plotter,
                     symbol : &str,
                     target_date : &NaiveDate,
                     today : &NaiveDate,
                     extra_training_params : &T::TrainingParams,
                     options : &ForecastOptions) -> anyhow::Result<PriceForecast> {
    let horizon_days = hyperparams::apply_horizon_policy(
        hyperparams::horizon_in_days(today, target_date), options.horizon_policy)?;
    let dims = hyperparams::select_for_horizon(horizon_days);

    let fetch_to_date = *today - chrono::Duration::days(1);
    let (history, history_metadata) = service.fetch_daily_closes(symbol, &options.history_start, &fetch_to_date)?;

    let closes : Vec<f64> = history.iter().map(|s| s.close).collect();
    let dataset = utils::extract_windows(&closes, dims.time_step)?;

    model.train(&history, &history_metadata, &dims, extra_training_params)?;

    // Accuracy is measured on the same windows the model was trained on, so
    // it overstates out-of-sample performance.
    let mut actual_prices = Vec::new();
    let mut predicted_prices = Vec::new();
    for (window, target) in &dataset {
        let prediction = model.predict(window)?;
        actual_prices.push(*target);
        predicted_prices.push(prediction);
    }

    let accuracy = utils::mean_absolute_percentage_error(&actual_prices, &predicted_prices)
        .ok_or_else(|| anyhow!("Accuracy is undefined for a history containing zero prices"))?;

    let graph_name = format!("{}/{}_prediction", options.graph_dir, symbol);
    plotter.plot_lines(&vec!((String::from("Actual Price"), actual_prices),
                             (String::from("Predicted Price"), predicted_prices)),
                       &format!("{} Stock Analysis", symbol), &graph_name)?;

    let latest_window = Vec::from(&closes[closes.len() - dims.time_step..]);
    let predicted_price = model.predict(&latest_window)?;

    Ok(PriceForecast {
        predicted_price : round_to_cents(predicted_price),
        graph_path : format!("{}.png", graph_name),
        accuracy : round_to_cents(accuracy)
    })
}

fn round_to_cents(value : f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyperparams::NetworkDimensions;
    use crate::ForecastError;
    use anyhow::anyhow;
    use chrono::Duration;
    use mockall::{Sequence, predicate::*};

    #[test]
    fn predict_price_with_enough_history() -> anyhow::Result<()> {
        let mut service = MockMarketDataService::new();
        let mut model = MockForecastModel::new();
        let mut plotter = MockPlotter::new();

        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let target_date = NaiveDate::from_ymd_opt(2024, 5, 25).unwrap();

        let closes : Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let (history, history_metadata) = build_history_and_meta("AAPL", &closes, &today);

        let expected_history = history.clone();
        let expected_metadata = history_metadata.clone();
        let mut seq = Sequence::new();
        service.expect_fetch_daily_closes()
            .with(eq("AAPL"), eq(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()),
                  eq(NaiveDate::from_ymd_opt(2024, 5, 14).unwrap()))
            .times(1)
            .in_sequence(&mut seq)
            .return_once(move |_, _, _| Ok((history, history_metadata)));

        model.expect_train()
            .withf(move |history, metadata, dims, extra_params|
                *history == expected_history && *metadata == expected_metadata &&
                *dims == NetworkDimensions { time_step : 20, hidden_size : 64 } &&
                *extra_params == (0.1, 1000))
            .times(1)
            .in_sequence(&mut seq)
            .return_once(|_, _, _, _| Ok(Vec::new()));

        model.expect_predict()
            .times(5)
            .returning(|_| Ok(110.0));

        plotter.expect_plot_lines()
            .withf(|y_points_list, title, filename|
                y_points_list.len() == 2 &&
                y_points_list[0] == (String::from("Actual Price"), vec!(120.0, 121.0, 122.0, 123.0, 124.0)) &&
                y_points_list[1] == (String::from("Predicted Price"), vec!(110.0, 110.0, 110.0, 110.0, 110.0)) &&
                title == "AAPL Stock Analysis" && filename == "graphs/AAPL_prediction")
            .times(1)
            .return_once(|_, _, _| Ok(()));

        let latest_window : Vec<f64> = (5..25).map(|i| 100.0 + i as f64).collect();
        model.expect_predict()
            .with(eq(latest_window))
            .times(1)
            .return_once(|_| Ok(142.339));

        let forecast = predict_price(&mut service, &mut model, &mut plotter, "AAPL",
            &target_date, &today, &(0.1, 1000), &ForecastOptions::default())?;

        assert_eq!(forecast.predicted_price, 142.34);
        assert_eq!(forecast.graph_path, "graphs/AAPL_prediction.png");
        assert_eq!(forecast.accuracy, 9.82);
        Ok(())
    }

    #[test]
    fn predict_price_with_history_equal_to_time_step() {
        let mut service = MockMarketDataService::new();
        let mut model = MockForecastModel::new();
        let mut plotter = MockPlotter::new();

        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let target_date = NaiveDate::from_ymd_opt(2024, 5, 25).unwrap();

        let closes : Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let (history, history_metadata) = build_history_and_meta("AAPL", &closes, &today);
        service.expect_fetch_daily_closes()
            .times(1)
            .return_once(move |_, _, _| Ok((history, history_metadata)));

        let result = predict_price(&mut service, &mut model, &mut plotter, "AAPL",
            &target_date, &today, &(0.1, 1000), &ForecastOptions::default());

        let error = result.unwrap_err();
        match error.downcast_ref::<ForecastError>() {
            Some(ForecastError::InsufficientHistory { required : 21, actual : 20 }) => {},
            other => panic!("Unexpected error {:?}", other)
        }
    }

    #[test]
    fn predict_price_failing_to_fetch_history() {
        let mut service = MockMarketDataService::new();
        let mut model = MockForecastModel::new();
        let mut plotter = MockPlotter::new();

        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let target_date = NaiveDate::from_ymd_opt(2024, 5, 25).unwrap();

        service.expect_fetch_daily_closes()
            .times(1)
            .return_once(|_, _, _| Err(ForecastError::DataFetch(String::from("unknown ticker")).into()));

        let result = predict_price(&mut service, &mut model, &mut plotter, "NOPE",
            &target_date, &today, &(0.1, 1000), &ForecastOptions::default());

        let error = result.unwrap_err();
        assert!(matches!(error.downcast_ref::<ForecastError>(), Some(ForecastError::DataFetch(_))));
    }

    #[test]
    fn predict_price_failing_to_train() {
        let mut service = MockMarketDataService::new();
        let mut model = MockForecastModel::new();
        let mut plotter = MockPlotter::new();

        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let target_date = NaiveDate::from_ymd_opt(2024, 5, 25).unwrap();

        let closes : Vec<f64> = (0..25).map(|i| 100.0 + i as f64).collect();
        let (history, history_metadata) = build_history_and_meta("AAPL", &closes, &today);
        service.expect_fetch_daily_closes()
            .times(1)
            .return_once(move |_, _, _| Ok((history, history_metadata)));

        model.expect_train()
            .times(1)
            .return_once(|_, _, _, _| Err(anyhow!("Failed")));

        let result = predict_price(&mut service, &mut model, &mut plotter, "AAPL",
            &target_date, &today, &(0.1, 1000), &ForecastOptions::default());

        assert!(result.is_err());
    }

    #[test]
    fn predict_price_with_past_target_date_is_rejected() {
        let mut service = MockMarketDataService::new();
        let mut model = MockForecastModel::new();
        let mut plotter = MockPlotter::new();

        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let target_date = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();

        let result = predict_price(&mut service, &mut model, &mut plotter, "AAPL",
            &target_date, &today, &(0.1, 1000), &ForecastOptions::default());

        let error = result.unwrap_err();
        assert!(matches!(error.downcast_ref::<ForecastError>(), Some(ForecastError::InvalidDate(_))));
    }

    #[test]
    fn predict_price_with_past_target_date_clamps_to_shortest_horizon() -> anyhow::Result<()> {
        let mut service = MockMarketDataService::new();
        let mut model = MockForecastModel::new();
        let mut plotter = MockPlotter::new();

        let today = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        let target_date = today;

        let closes : Vec<f64> = (0..15).map(|i| 100.0 + i as f64).collect();
        let (history, history_metadata) = build_history_and_meta("AAPL", &closes, &today);
        service.expect_fetch_daily_closes()
            .times(1)
            .return_once(move |_, _, _| Ok((history, history_metadata)));

        model.expect_train()
            .withf(|_, _, dims, _| *dims == NetworkDimensions { time_step : 10, hidden_size : 32 })
            .times(1)
            .return_once(|_, _, _, _| Ok(Vec::new()));
        model.expect_predict()
            .times(6)
            .returning(|_| Ok(110.0));

        plotter.expect_plot_lines()
            .times(1)
            .return_once(|_, _, _| Ok(()));

        let mut options = ForecastOptions::default();
        options.set_horizon_policy(HorizonPolicy::Clamp);

        let forecast = predict_price(&mut service, &mut model, &mut plotter, "AAPL",
            &target_date, &today, &(0.1, 1000), &options)?;

        assert_eq!(forecast.predicted_price, 110.0);
        Ok(())
    }

    #[test]
    fn forecast_response_serializes_to_expected_json() -> anyhow::Result<()> {
        let forecast = PriceForecast { predicted_price : 142.34,
            graph_path : String::from("graphs/AAPL_prediction.png"), accuracy : 9.82 };

        let json = serde_json::to_string(&forecast)?;
        assert_eq!(json, "{\"predicted_price\":142.34,\"graph_path\":\"graphs/AAPL_prediction.png\",\"accuracy\":9.82}");
        Ok(())
    }

    fn build_history_and_meta(symbol : &str, closes : &[f64], today : &NaiveDate)
            -> (Vec<DailyClose>, HistoryMetadata) {
        let start_date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let history = closes.iter().enumerate()
            .map(|(i, close)| DailyClose { date : start_date + Duration::days(i as i64), close : *close })
            .collect();
        let history_metadata = HistoryMetadata { symbol : String::from(symbol),
            from_date : start_date, to_date : *today - Duration::days(1) };

        (history, history_metadata)
    }
}
