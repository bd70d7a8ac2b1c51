use crate::ForecastError;

// Min-max scale fitted once on training data; the same pair must be reused
// for every later scale/unscale call so the round trip stays exact.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct ScaleParams {
    pub min : f64,
    pub max : f64
}

impl ScaleParams {
    pub fn fit(values : &[f64]) -> anyhow::Result<ScaleParams> {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for value in values {
            min = min.min(*value);
            max = max.max(*value);
        }

        if !min.is_finite() || !max.is_finite() || min == max {
            return Err(ForecastError::DegenerateRange.into());
        }

        Ok(ScaleParams { min, max })
    }

    pub fn scale(&self, value : f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    pub fn unscale(&self, value : f64) -> f64 {
        value * (self.max - self.min) + self.min
    }

    pub fn scale_all(&self, values : &[f64]) -> Vec<f64> {
        values.iter().map(|v| self.scale(*v)).collect()
    }
}
