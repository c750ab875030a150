//! Time-series smoothing
//!
//! Interchangeable smoothers for per-pixel time series:
//! - **whittaker**: weighted penalized least squares, smooths through
//!   gaps (the default mode)
//! - **whittaker_direct**: the same penalty solved directly on a
//!   gap-free series
//! - **fourier**: harmonic truncation in the frequency domain
//! - **rbf**: Gaussian kernel convolution
//!
//! [`smooth`] dispatches by strategy, optionally gap-filling first,
//! and refuses up front to feed a gappy series to a mode that cannot
//! handle it. Smoothing silently through unhandled gaps would corrupt
//! every index computed downstream.

mod fourier;
mod rbf;
mod whittaker;

pub use fourier::{fourier_smooth, FourierParams};
pub use rbf::{rbf_smooth, rbf_smooth_reference, RbfParams};
pub use whittaker::{whittaker, whittaker_direct, WhittakerParams};

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use verdis_core::{Error, Result};

use crate::series::interpolate_missing;

/// A smoothing strategy with its parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SmoothMethod {
    Whittaker(WhittakerParams),
    WhittakerDirect(WhittakerParams),
    Fourier(FourierParams),
    Rbf(RbfParams),
}

/// Registry of smoother names, filled with default parameters.
pub const SMOOTHERS: &[(&str, fn() -> SmoothMethod)] = &[
    ("whittaker", || {
        SmoothMethod::Whittaker(WhittakerParams::default())
    }),
    ("whittaker_direct", || {
        SmoothMethod::WhittakerDirect(WhittakerParams::default())
    }),
    ("fourier", || SmoothMethod::Fourier(FourierParams::default())),
    ("rbf", || SmoothMethod::Rbf(RbfParams::default())),
];

impl SmoothMethod {
    /// Registry name of this strategy
    pub fn name(&self) -> &'static str {
        match self {
            Self::Whittaker(_) => "whittaker",
            Self::WhittakerDirect(_) => "whittaker_direct",
            Self::Fourier(_) => "fourier",
            Self::Rbf(_) => "rbf",
        }
    }

    /// Whether this mode accepts missing samples
    pub fn tolerates_missing(&self) -> bool {
        matches!(self, Self::Whittaker(_))
    }
}

impl FromStr for SmoothMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        SMOOTHERS
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, make)| make())
            .ok_or_else(|| Error::UnknownStrategy {
                kind: "smoothing",
                name: s.to_string(),
            })
    }
}

/// Smooth one series with the chosen strategy.
///
/// With `fill_gaps`, missing samples are linearly interpolated before
/// the smoother runs. A series with no valid sample at all is returned
/// unchanged, so broadcasts over degenerate pixels stay total. If
/// missing samples remain and the mode cannot tolerate them, the call
/// fails before any numeric work.
pub fn smooth(data: &[f64], method: &SmoothMethod, fill_gaps: bool) -> Result<Vec<f64>> {
    if data.iter().all(|v| v.is_nan()) {
        return Ok(data.to_vec());
    }

    let filled;
    let input: &[f64] = if fill_gaps {
        filled = interpolate_missing(data);
        &filled
    } else {
        data
    };

    if !method.tolerates_missing() && input.iter().any(|v| v.is_nan()) {
        return Err(Error::MissingValues {
            mode: method.name(),
        });
    }

    match method {
        SmoothMethod::Whittaker(params) => whittaker(input, params),
        SmoothMethod::WhittakerDirect(params) => whittaker_direct(input, params),
        SmoothMethod::Fourier(params) => fourier_smooth(input, params),
        SmoothMethod::Rbf(params) => rbf_smooth(input, params),
    }
}
