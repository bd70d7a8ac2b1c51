use chrono::NaiveDate;
use strum::EnumString;

use crate::ForecastError;

#[derive(Debug, PartialEq, Clone, Copy)]
pub struct NetworkDimensions {
    pub time_step : usize,
    pub hidden_size : usize
}

// Ordered (upper bound in days, time_step, hidden_size). A horizon falls into
// the first bucket whose upper bound it does not exceed.
const HORIZON_TABLE : [(i64, usize, usize); 8] = [
    (7, 10, 32),
    (30, 20, 64),
    (60, 30, 128),
    (90, 40, 256),
    (120, 50, 384),
    (150, 60, 512),
    (180, 75, 768),
    (210, 90, 1024)
];

const BEYOND_TABLE_DIMENSIONS : NetworkDimensions = NetworkDimensions { time_step : 120, hidden_size : 2048 };

pub fn select_for_horizon(horizon_days : i64) -> NetworkDimensions {
    for &(upper_bound, time_step, hidden_size) in HORIZON_TABLE.iter() {
        if horizon_days <= upper_bound {
            return NetworkDimensions { time_step, hidden_size };
        }
    }

    BEYOND_TABLE_DIMENSIONS
}

#[derive(Debug, PartialEq, Clone, Copy, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum HorizonPolicy {
    Reject,
    Clamp
}

pub fn parse_target_date(text : &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| ForecastError::InvalidDate(String::from(text)).into())
}

pub fn horizon_in_days(today : &NaiveDate, target_date : &NaiveDate) -> i64 {
    target_date.signed_duration_since(*today).num_days()
}

pub fn apply_horizon_policy(horizon_days : i64, policy : HorizonPolicy) -> anyhow::Result<i64> {
    if horizon_days > 0 {
        return Ok(horizon_days);
    }

    match policy {
        HorizonPolicy::Reject => Err(ForecastError::InvalidDate(
            format!("target date must be in the future (horizon was {} days)", horizon_days)).into()),
        HorizonPolicy::Clamp => Ok(1)
    }
}
