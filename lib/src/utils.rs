use crate::ForecastError;

pub fn extract_windows(closes : &[f64], time_step : usize) -> anyhow::Result<Vec<(Vec<f64>, f64)>> {
    if closes.len() <= time_step {
        return Err(ForecastError::InsufficientHistory {
            required : time_step + 1, actual : closes.len() }.into());
    }

    let mut windows = Vec::new();
    for i in time_step..closes.len() {
        windows.push((Vec::from(&closes[i - time_step..i]), closes[i]));
    }

    Ok(windows)
}

pub fn mean_squared_error(y_true : &[f64], y_pred : &[f64]) -> f64 {
    let sum : f64 = y_true.iter().zip(y_pred.iter()).map(|(t, p)| (t - p) * (t - p)).sum();
    sum / y_true.len() as f64
}

// Undefined when the arrays are empty, differ in length or any true value is
// zero; callers decide how to report that.
pub fn mean_absolute_percentage_error(y_true : &[f64], y_pred : &[f64]) -> Option<f64> {
    if y_true.is_empty() || y_true.len() != y_pred.len() || y_true.iter().any(|v| *v == 0.0) {
        return None;
    }

    let sum : f64 = y_true.iter().zip(y_pred.iter()).map(|(t, p)| ((t - p) / t).abs()).sum();
    Some(sum / y_true.len() as f64 * 100.0)
}
