use crate::hyperparams::NetworkDimensions;
use crate::market_data::{DailyClose, HistoryMetadata};

#[cfg(test)]
use mockall::{automock};

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct EpochLoss {
    pub epoch : u32,
    pub loss : f64
}

#[cfg_attr(test, automock(type TrainingParams = (f64, u32);))]
pub trait ForecastModel {
    type TrainingParams;

    fn train(&mut self, history : &Vec<DailyClose>, history_metadata : &HistoryMetadata,
             dims : &NetworkDimensions,
             extra_params : &Self::TrainingParams) -> anyhow::Result<Vec<EpochLoss>>;
    fn predict(&mut self, window : &Vec<f64>) -> anyhow::Result<f64>;
}
