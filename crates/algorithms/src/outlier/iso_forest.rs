//! Library-backed isolation forest detection
//!
//! Fits an isolation-forest ensemble on the valid scalar samples of a
//! series and flags the points whose anomaly score lands above the
//! `1 − contamination` quantile. Ensemble construction is delegated to
//! the `extended-isolation-forest` crate (extension level 0, i.e. the
//! standard axis-parallel forest); scoring of the fitted points runs
//! through the workspace parallelism shim.

use extended_isolation_forest::{Forest, ForestOptions};
use serde::{Deserialize, Serialize};
use verdis_core::{Error, Result};

use crate::maybe_rayon::*;
use crate::outlier::Detection;
use crate::series::rolling::quantile_sorted;

/// Parameters for the library-backed isolation forest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsoForestParams {
    /// Expected fraction of outliers in the series (default 0.005)
    pub contamination: f64,
    /// Number of trees in the ensemble (default 100)
    pub n_trees: usize,
    /// Sub-sample size per tree, clamped to the number of valid
    /// samples (default 256)
    pub sample_size: usize,
    /// Optional depth limit per tree; `None` lets the ensemble choose
    pub max_depth: Option<usize>,
}

impl Default for IsoForestParams {
    fn default() -> Self {
        Self {
            contamination: 0.005,
            n_trees: 100,
            sample_size: 256,
            max_depth: None,
        }
    }
}

/// Detect outliers with an isolation-forest ensemble.
///
/// Missing samples are dropped before fitting and are never flagged.
/// No replacement series is produced; combine with the `drop` policy.
pub fn iso_forest(data: &[f64], params: &IsoForestParams) -> Result<Detection> {
    if !(params.contamination > 0.0 && params.contamination <= 0.5) {
        return Err(Error::InvalidParameter {
            name: "contamination",
            value: params.contamination.to_string(),
            reason: "contamination must be in (0, 0.5]".into(),
        });
    }
    if params.n_trees == 0 {
        return Err(Error::InvalidParameter {
            name: "n_trees",
            value: params.n_trees.to_string(),
            reason: "ensemble needs at least one tree".into(),
        });
    }

    let mut outliers = vec![false; data.len()];

    let valid: Vec<(usize, f64)> = data
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, &v)| (i, v))
        .collect();
    // Nothing to isolate against
    if valid.len() < 2 {
        return Ok(Detection {
            outliers,
            replacement: None,
        });
    }

    let samples: Vec<[f64; 1]> = valid.iter().map(|&(_, v)| [v]).collect();
    let options = ForestOptions {
        n_trees: params.n_trees,
        sample_size: params.sample_size.min(samples.len()),
        max_tree_depth: params.max_depth,
        extension_level: 0,
    };
    let forest: Forest<f64, 1> = Forest::from_slice(&samples, &options)
        .map_err(|e| Error::Algorithm(format!("isolation forest fit failed: {e:?}")))?;

    let scores: Vec<f64> = (0..samples.len())
        .into_par_iter()
        .map(|i| forest.score(&samples[i]))
        .collect();

    let mut sorted = scores.clone();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let threshold = quantile_sorted(&sorted, 1.0 - params.contamination);

    for (&(idx, _), &score) in valid.iter().zip(&scores) {
        if score > threshold {
            outliers[idx] = true;
        }
    }

    Ok(Detection {
        outliers,
        replacement: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spiked_series(n: usize, spike_at: usize) -> Vec<f64> {
        let mut data: Vec<f64> = (0..n).map(|i| 10.0 + ((i * 7) % 5) as f64 * 0.1).collect();
        data[spike_at] = 1000.0;
        data
    }

    #[test]
    fn test_iso_forest_flags_spike() {
        let data = spiked_series(200, 60);
        let params = IsoForestParams {
            contamination: 0.01,
            ..Default::default()
        };
        let det = iso_forest(&data, &params).unwrap();
        assert!(det.outliers[60], "spike should be isolated");
        let flagged = det.outliers.iter().filter(|&&f| f).count();
        assert!(flagged <= 4, "contamination bound exceeded: {flagged}");
    }

    #[test]
    fn test_iso_forest_missing_never_flagged() {
        let mut data = spiked_series(100, 30);
        data[5] = f64::NAN;
        data[80] = f64::NAN;
        let det = iso_forest(
            &data,
            &IsoForestParams {
                contamination: 0.05,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(!det.outliers[5]);
        assert!(!det.outliers[80]);
    }

    #[test]
    fn test_iso_forest_no_replacement() {
        let data = spiked_series(50, 10);
        let det = iso_forest(
            &data,
            &IsoForestParams {
                contamination: 0.05,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(det.replacement.is_none());
    }

    #[test]
    fn test_iso_forest_contamination_validated() {
        let data = vec![1.0, 2.0, 3.0];
        let params = IsoForestParams {
            contamination: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            iso_forest(&data, &params),
            Err(Error::InvalidParameter { .. })
        ));
    }
}
