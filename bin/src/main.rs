mod neural_model;
mod plotters_plotter;
mod yahoo_service;

use forecast_lib::commands;
use forecast_lib::hyperparams::{self, HorizonPolicy};
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "forecast-app",
    about = "Predicts a future stock closing price with a regression network trained on the spot")]
struct Options {
    /// Ticker symbol, e.g. AAPL
    ticker : String,

    /// Target date in YYYY-MM-DD format
    target_date : String,

    /// Number of full-batch training epochs
    #[structopt(long, default_value = "1000")]
    epochs : u32,

    /// Gradient descent learning rate
    #[structopt(long = "learning-rate", default_value = "0.1")]
    learning_rate : f64,

    /// Seed for the network's weight initialization
    #[structopt(long, default_value = "1138")]
    seed : u64,

    /// What to do with a target date that is not in the future: reject or clamp
    #[structopt(long = "horizon-policy", default_value = "reject")]
    horizon_policy : HorizonPolicy,

    /// Directory the prediction chart is written to
    #[structopt(long = "graph-dir", default_value = "graphs")]
    graph_dir : String
}

fn main() -> anyhow::Result<()> {
    let options = Options::from_args();

    let target_date = hyperparams::parse_target_date(&options.target_date)?;
    let today = chrono::Utc::now().date_naive();

    let mut service = yahoo_service::YahooMarketService::create()?;
    let mut model = neural_model::NeuralForecastModel::new(options.seed);
    let mut plotter = plotters_plotter::PlottersPlotter::create()?;

    let mut forecast_options = commands::ForecastOptions::default();
    forecast_options.set_horizon_policy(options.horizon_policy);
    forecast_options.set_graph_dir(options.graph_dir);

    let forecast = commands::predict_price(&mut service, &mut model, &mut plotter,
        &options.ticker, &target_date, &today,
        &(options.learning_rate, options.epochs), &forecast_options)?;

    println!("{}", serde_json::to_string(&forecast)?);
    Ok(())
}
