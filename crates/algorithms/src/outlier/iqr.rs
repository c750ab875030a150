//! Rolling interquartile-range outlier detection

use serde::{Deserialize, Serialize};
use verdis_core::{Error, Result};

use crate::outlier::Detection;
use crate::series::{rolling_mean, rolling_quantile};

/// Parameters for rolling IQR detection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IqrParams {
    /// Rolling window size in samples (default 120)
    pub window: usize,
    /// Lower quantile (default 0.25)
    pub q_low: f64,
    /// Upper quantile (default 0.75)
    pub q_high: f64,
    /// Fence multiplier on the interquartile range (default 1.5)
    pub factor: f64,
}

impl Default for IqrParams {
    fn default() -> Self {
        Self {
            window: 120,
            q_low: 0.25,
            q_high: 0.75,
            factor: 1.5,
        }
    }
}

/// Detect outliers against Tukey fences built from rolling quantiles.
///
/// A sample is flagged when it falls below `Q1 − factor×IQR` or above
/// `Q3 + factor×IQR`, with the quantiles computed over a centered
/// rolling window. Missing samples are never flagged. The replacement
/// series is the rolling mean.
pub fn iqr(data: &[f64], params: &IqrParams) -> Result<Detection> {
    if params.window == 0 {
        return Err(Error::InvalidParameter {
            name: "window",
            value: params.window.to_string(),
            reason: "window must be at least 1 sample".into(),
        });
    }
    if !(0.0..=1.0).contains(&params.q_low)
        || !(0.0..=1.0).contains(&params.q_high)
        || params.q_low >= params.q_high
    {
        return Err(Error::InvalidParameter {
            name: "q_low/q_high",
            value: format!("{}/{}", params.q_low, params.q_high),
            reason: "quantiles must satisfy 0 <= q_low < q_high <= 1".into(),
        });
    }
    if !(params.factor >= 0.0) {
        return Err(Error::InvalidParameter {
            name: "factor",
            value: params.factor.to_string(),
            reason: "fence multiplier must be non-negative".into(),
        });
    }

    let q1 = rolling_quantile(data, params.window, params.q_low);
    let q3 = rolling_quantile(data, params.window, params.q_high);

    let outliers = data
        .iter()
        .zip(q1.iter().zip(&q3))
        .map(|(&v, (&lo, &hi))| {
            let range = hi - lo;
            v < lo - params.factor * range || v > hi + params.factor * range
        })
        .collect();

    Ok(Detection {
        outliers,
        replacement: Some(rolling_mean(data, params.window)),
    })
}
