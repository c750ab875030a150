//! Rolling z-score outlier detection

use serde::{Deserialize, Serialize};
use verdis_core::{Error, Result};

use crate::outlier::Detection;
use crate::series::{rolling_mean, rolling_std};

/// Parameters for rolling z-score detection
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ZscoreParams {
    /// Rolling window size in samples (default 120)
    pub window: usize,
    /// Symmetric threshold on the standardized value (default 1.0)
    pub thresh: f64,
}

impl Default for ZscoreParams {
    fn default() -> Self {
        Self {
            window: 120,
            thresh: 1.0,
        }
    }
}

/// Detect outliers by standardizing each sample against the mean and
/// population standard deviation of its centered rolling window.
///
/// A sample is flagged when its standardized value falls outside
/// `±thresh`. Missing samples are flagged (they carry no usable value,
/// and the `avg` policy then fills them from the window mean); samples
/// in a zero-variance window standardize to 0 and are never flagged.
/// Edge windows use however many samples are available.
///
/// The replacement series is the rolling mean.
pub fn zscore(data: &[f64], params: &ZscoreParams) -> Result<Detection> {
    if params.window == 0 {
        return Err(Error::InvalidParameter {
            name: "window",
            value: params.window.to_string(),
            reason: "window must be at least 1 sample".into(),
        });
    }
    if !(params.thresh > 0.0) {
        return Err(Error::InvalidParameter {
            name: "thresh",
            value: params.thresh.to_string(),
            reason: "threshold must be positive".into(),
        });
    }

    let avg = rolling_mean(data, params.window);
    let std = rolling_std(data, params.window);

    let outliers = data
        .iter()
        .zip(avg.iter().zip(&std))
        .map(|(&v, (&m, &s))| {
            let z = if s > 0.0 {
                (v - m) / s
            } else if v.is_nan() {
                f64::NAN
            } else {
                0.0
            };
            // NaN compares false on both sides, so missing samples flag
            !(z >= -params.thresh && z <= params.thresh)
        })
        .collect();

    Ok(Detection {
        outliers,
        replacement: Some(avg),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zscore_mask_shape() {
        let data: Vec<f64> = (0..50).map(|i| ((i * 7) % 11) as f64).collect();
        let det = zscore(&data, &ZscoreParams::default()).unwrap();
        assert_eq!(det.outliers.len(), data.len());
        assert_eq!(det.replacement.as_ref().unwrap().len(), data.len());
    }

    #[test]
    fn test_zscore_flags_single_spike() {
        let mut data = vec![10.0; 24];
        data[7] = 1000.0;
        let det = zscore(&data, &ZscoreParams::default()).unwrap();
        for (i, &flag) in det.outliers.iter().enumerate() {
            assert_eq!(flag, i == 7, "unexpected flag at {i}");
        }
    }

    #[test]
    fn test_zscore_constant_series_not_flagged() {
        let data = vec![10.0; 24];
        let det = zscore(&data, &ZscoreParams { window: 12, thresh: 1.0 }).unwrap();
        assert!(det.outliers.iter().all(|&f| !f));
    }

    #[test]
    fn test_zscore_flags_missing_samples() {
        let mut data: Vec<f64> = (0..20).map(|i| (i % 5) as f64).collect();
        data[4] = f64::NAN;
        let det = zscore(&data, &ZscoreParams { window: 5, thresh: 3.0 }).unwrap();
        assert!(det.outliers[4]);
    }

    #[test]
    fn test_zscore_replacement_is_rolling_mean() {
        let data = vec![2.0, 4.0, 6.0, 8.0];
        let det = zscore(&data, &ZscoreParams { window: 3, thresh: 1.0 }).unwrap();
        let repl = det.replacement.unwrap();
        assert!((repl[1] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_zscore_window_zero_rejected() {
        let data = vec![1.0, 2.0];
        assert!(zscore(&data, &ZscoreParams { window: 0, thresh: 1.0 }).is_err());
    }
}
