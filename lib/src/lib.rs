pub mod commands;
pub mod forecast_model;
pub mod hyperparams;
pub mod market_data;
pub mod plotter;
pub mod scaling;
pub mod utils;

pub use forecast_model::{EpochLoss, ForecastModel};
pub use hyperparams::{HorizonPolicy, NetworkDimensions};
pub use market_data::{DailyClose, HistoryMetadata, MarketDataService};
pub use plotter::Plotter;
pub use scaling::ScaleParams;

#[derive(Debug)]
pub enum ForecastError {
    DataFetch(String),
    InsufficientHistory { required : usize, actual : usize },
    DegenerateRange,
    InvalidDate(String)
}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f : &mut std::fmt::Formatter<'_>) -> std::result::Result<(), std::fmt::Error> {
        match self {
            ForecastError::DataFetch(text) =>
                write!(f, "Failed to fetch market data: {}", text),
            ForecastError::InsufficientHistory { required, actual } =>
                write!(f, "History size must be at least {} (was {})", required, actual),
            ForecastError::DegenerateRange =>
                write!(f, "Cannot normalize a series whose minimum and maximum are equal"),
            ForecastError::InvalidDate(text) =>
                write!(f, "Invalid target date: {}", text)
        }
    }
}

impl std::error::Error for ForecastError {
}
