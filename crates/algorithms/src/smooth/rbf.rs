//! Gaussian kernel smoothing
//!
//! Convolves the series with a fixed-width Gaussian, i.e. a low-pass
//! filter. The default path truncates the kernel at four standard
//! deviations and reflects the series at its boundaries; the reference
//! path spells the weighted sum out over every input position and
//! exists to pin the fast path down numerically.

use serde::{Deserialize, Serialize};
use verdis_core::{Error, Result};

/// Parameters for Gaussian kernel smoothing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RbfParams {
    /// Kernel standard deviation in samples (default 12)
    pub width: f64,
}

impl Default for RbfParams {
    fn default() -> Self {
        Self { width: 12.0 }
    }
}

fn validate(data: &[f64], params: &RbfParams) -> Result<()> {
    if !(params.width > 0.0) || !params.width.is_finite() {
        return Err(Error::InvalidParameter {
            name: "width",
            value: params.width.to_string(),
            reason: "kernel width must be finite and positive".into(),
        });
    }
    if data.iter().any(|v| v.is_nan()) {
        return Err(Error::MissingValues { mode: "rbf" });
    }
    Ok(())
}

/// Reflect an out-of-range position back into `[0, n)`.
fn reflect(mut idx: isize, n: isize) -> usize {
    loop {
        if idx < 0 {
            idx = -idx - 1;
        } else if idx >= n {
            idx = 2 * n - idx - 1;
        } else {
            return idx as usize;
        }
    }
}

/// Smooth a series with a truncated Gaussian kernel.
///
/// The kernel spans four standard deviations to each side and the
/// series is reflected at its boundaries.
pub fn rbf_smooth(data: &[f64], params: &RbfParams) -> Result<Vec<f64>> {
    validate(data, params)?;

    let n = data.len();
    if n < 2 {
        return Ok(data.to_vec());
    }

    let sigma = params.width;
    let radius = (4.0 * sigma + 0.5) as usize;
    let two_sigma_sq = 2.0 * sigma * sigma;

    let mut kernel = Vec::with_capacity(2 * radius + 1);
    let mut kernel_sum = 0.0;
    for j in -(radius as isize)..=(radius as isize) {
        let w = (-(j * j) as f64 / two_sigma_sq).exp();
        kernel.push(w);
        kernel_sum += w;
    }
    for w in kernel.iter_mut() {
        *w /= kernel_sum;
    }

    let out = (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, &w)| {
                    let idx = i as isize + k as isize - radius as isize;
                    w * data[reflect(idx, n as isize)]
                })
                .sum()
        })
        .collect();

    Ok(out)
}

/// Reference Gaussian smoothing: for every output position, normalized
/// weights over all input positions, no truncation or reflection.
///
/// Matches [`rbf_smooth`] away from the series boundaries; kept public
/// so the fast path stays testable against it.
pub fn rbf_smooth_reference(data: &[f64], params: &RbfParams) -> Result<Vec<f64>> {
    validate(data, params)?;

    let n = data.len();
    let two_sigma_sq = 2.0 * params.width * params.width;

    let out = (0..n)
        .map(|i| {
            let mut weights = Vec::with_capacity(n);
            let mut sum = 0.0;
            for j in 0..n {
                let dist = j as f64 - i as f64;
                let w = (-(dist * dist) / two_sigma_sq).exp();
                weights.push(w);
                sum += w;
            }
            data.iter()
                .zip(&weights)
                .map(|(&v, &w)| v * w / sum)
                .sum()
        })
        .collect();

    Ok(out)
}
