//! Outlier detection and removal
//!
//! Detectors for per-pixel time series:
//! - **zscore**: rolling z-score against window mean/std
//! - **iqr**: rolling Tukey fences from window quantiles
//! - **iso_forest**: library-backed isolation forest on scalar values
//! - **iso_forest_ts**: from-scratch isolation forest over sliding
//!   windows
//!
//! Detection produces a boolean mask plus, for the rolling detectors,
//! a replacement series (the rolling mean). [`remove_outliers`]
//! applies a [`ReplacePolicy`] on top: `drop` turns flagged samples
//! into missing values, `avg` substitutes the replacement series.

mod iqr;
mod iso_forest;
mod iso_forest_ts;
mod zscore;

pub use iqr::{iqr, IqrParams};
pub use iso_forest::{iso_forest, IsoForestParams};
pub use iso_forest_ts::{iso_forest_ts, IsoForestTsParams};
pub use zscore::{zscore, ZscoreParams};

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use verdis_core::{Error, Result};

/// Result of running a detector over one series
#[derive(Debug, Clone)]
pub struct Detection {
    /// One flag per input sample
    pub outliers: Vec<bool>,
    /// Substitute values for flagged samples, where the detector
    /// provides them
    pub replacement: Option<Vec<f64>>,
}

/// An outlier detection strategy with its parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OutlierMethod {
    Zscore(ZscoreParams),
    Iqr(IqrParams),
    IsoForest(IsoForestParams),
    IsoForestTs(IsoForestTsParams),
}

/// Registry of detector names, filled with default parameters.
pub const DETECTORS: &[(&str, fn() -> OutlierMethod)] = &[
    ("zscore", || OutlierMethod::Zscore(ZscoreParams::default())),
    ("iqr", || OutlierMethod::Iqr(IqrParams::default())),
    ("iso_forest", || {
        OutlierMethod::IsoForest(IsoForestParams::default())
    }),
    ("iso_forest_ts", || {
        OutlierMethod::IsoForestTs(IsoForestTsParams::default())
    }),
];

impl OutlierMethod {
    /// Registry name of this strategy
    pub fn name(&self) -> &'static str {
        match self {
            Self::Zscore(_) => "zscore",
            Self::Iqr(_) => "iqr",
            Self::IsoForest(_) => "iso_forest",
            Self::IsoForestTs(_) => "iso_forest_ts",
        }
    }

    /// Whether this detector produces a replacement series
    pub fn has_replacement(&self) -> bool {
        matches!(self, Self::Zscore(_) | Self::Iqr(_))
    }

    /// Run the detector over one series.
    ///
    /// A series with no valid sample at all yields an all-false mask,
    /// so broadcasts over degenerate pixels stay total.
    pub fn detect(&self, data: &[f64]) -> Result<Detection> {
        if data.iter().all(|v| v.is_nan()) {
            let replacement = self
                .has_replacement()
                .then(|| vec![f64::NAN; data.len()]);
            return Ok(Detection {
                outliers: vec![false; data.len()],
                replacement,
            });
        }

        match self {
            Self::Zscore(params) => zscore(data, params),
            Self::Iqr(params) => iqr(data, params),
            Self::IsoForest(params) => iso_forest(data, params),
            Self::IsoForestTs(params) => iso_forest_ts(data, params),
        }
    }
}

impl FromStr for OutlierMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DETECTORS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, make)| make())
            .ok_or_else(|| Error::UnknownStrategy {
                kind: "outlier",
                name: s.to_string(),
            })
    }
}

/// What to do with a flagged sample
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReplacePolicy {
    /// Replace with a missing value
    #[serde(rename = "drop")]
    Drop,
    /// Replace with the detector's replacement series
    #[serde(rename = "avg")]
    Average,
}

impl FromStr for ReplacePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "drop" => Ok(Self::Drop),
            "avg" => Ok(Self::Average),
            _ => Err(Error::UnknownStrategy {
                kind: "replacement",
                name: s.to_string(),
            }),
        }
    }
}

/// Detect and replace outliers in one series.
///
/// Requesting [`ReplacePolicy::Average`] with a detector that produces
/// no replacement series is a usage error.
pub fn remove_outliers(
    data: &[f64],
    method: &OutlierMethod,
    policy: ReplacePolicy,
) -> Result<Vec<f64>> {
    let detection = method.detect(data)?;

    match policy {
        ReplacePolicy::Drop => Ok(data
            .iter()
            .zip(&detection.outliers)
            .map(|(&v, &flag)| if flag { f64::NAN } else { v })
            .collect()),
        ReplacePolicy::Average => {
            let replacement = detection
                .replacement
                .as_ref()
                .ok_or(Error::NoReplacement {
                    mode: method.name(),
                })?;
            Ok(data
                .iter()
                .zip(&detection.outliers)
                .zip(replacement)
                .map(|((&v, &flag), &r)| if flag { r } else { v })
                .collect())
        }
    }
}
