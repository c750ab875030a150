//! Whittaker penalized least-squares smoothing
//!
//! Balances fidelity to the raw samples against a roughness penalty on
//! the d-th order finite differences of the output (Eilers 2003).
//! Two realizations:
//!
//! - [`whittaker_direct`]: assembles `(I + lambda * D'D)` as a banded
//!   system and solves it by banded LU elimination. Gap-free series
//!   only.
//! - [`whittaker`]: the weighted variant, via the `whittaker-eilers`
//!   crate. Missing samples get fidelity weight 0 (with a sentinel
//!   substituted for the solver), so the fit smooths straight through
//!   gaps without a pre-fill.

use serde::{Deserialize, Serialize};
use verdis_core::{Error, Result};
use whittaker_eilers::WhittakerSmoother;

/// Stand-in value the weighted solver sees at zero-weight samples
const GAP_SENTINEL: f64 = -99999.0;

/// Parameters for Whittaker smoothing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WhittakerParams {
    /// Roughness penalty weight; larger is smoother (default 64)
    pub lambda: f64,
    /// Order of the penalized finite difference (default 1)
    pub order: usize,
}

impl Default for WhittakerParams {
    fn default() -> Self {
        Self {
            lambda: 64.0,
            order: 1,
        }
    }
}

fn validate(data: &[f64], params: &WhittakerParams) -> Result<()> {
    if !(params.lambda >= 0.0) || !params.lambda.is_finite() {
        return Err(Error::InvalidParameter {
            name: "lambda",
            value: params.lambda.to_string(),
            reason: "penalty weight must be finite and non-negative".into(),
        });
    }
    if params.order == 0 {
        return Err(Error::InvalidParameter {
            name: "order",
            value: params.order.to_string(),
            reason: "difference order must be at least 1".into(),
        });
    }
    if data.len() <= params.order {
        return Err(Error::InvalidParameter {
            name: "order",
            value: params.order.to_string(),
            reason: format!(
                "series of length {} is too short for this difference order",
                data.len()
            ),
        });
    }
    Ok(())
}

/// Weighted Whittaker smoothing, tolerant of missing samples.
pub fn whittaker(data: &[f64], params: &WhittakerParams) -> Result<Vec<f64>> {
    validate(data, params)?;

    let positions: Vec<f64> = (0..data.len()).map(|i| i as f64).collect();
    let weights: Vec<f64> = data
        .iter()
        .map(|v| if v.is_nan() { 0.0 } else { 1.0 })
        .collect();
    let filled: Vec<f64> = data
        .iter()
        .map(|v| if v.is_nan() { GAP_SENTINEL } else { *v })
        .collect();

    let smoother = WhittakerSmoother::new(
        params.lambda,
        params.order,
        data.len(),
        Some(&positions),
        Some(&weights),
    )
    .map_err(|e| Error::Algorithm(format!("whittaker setup failed: {e:?}")))?;
    smoother
        .smooth(&filled)
        .map_err(|e| Error::Algorithm(format!("whittaker solve failed: {e:?}")))
}

/// Direct Whittaker smoothing of a gap-free series.
///
/// Solves `(I + lambda * D'D) z = y` where `D` is the d-th order
/// difference matrix, via LU elimination restricted to the band.
pub fn whittaker_direct(data: &[f64], params: &WhittakerParams) -> Result<Vec<f64>> {
    validate(data, params)?;
    if data.iter().any(|v| v.is_nan()) {
        return Err(Error::MissingValues {
            mode: "whittaker_direct",
        });
    }

    let n = data.len();
    let d = params.order;
    let coeffs = difference_coefficients(d);

    // Band storage: row i holds A[i][i-d ..= i+d] at offsets 0..2d
    let width = 2 * d + 1;
    let mut band = vec![0.0; n * width];
    for i in 0..n {
        for j in i.saturating_sub(d)..(i + d + 1).min(n) {
            // (D'D)[i][j] = sum over difference rows covering both i and j
            let r_lo = j.max(i).saturating_sub(d);
            let r_hi = j.min(i).min(n - d - 1);
            let mut dtd = 0.0;
            for r in r_lo..=r_hi {
                dtd += coeffs[i - r] * coeffs[j - r];
            }
            let mut a = params.lambda * dtd;
            if i == j {
                a += 1.0;
            }
            band[i * width + (j + d - i)] = a;
        }
    }

    let mut rhs = data.to_vec();
    banded_lu_solve(n, d, width, &mut band, &mut rhs)?;
    Ok(rhs)
}

/// Coefficients of the d-th order finite difference, e.g. `[-1, 1]`
/// for d=1 and `[1, -2, 1]` for d=2.
fn difference_coefficients(d: usize) -> Vec<f64> {
    let mut coeffs = vec![1.0];
    for _ in 0..d {
        let mut next = vec![0.0; coeffs.len() + 1];
        for (k, &c) in coeffs.iter().enumerate() {
            next[k] -= c;
            next[k + 1] += c;
        }
        coeffs = next;
    }
    coeffs
}

/// In-place LU elimination of a banded system with half-bandwidth `d`.
/// The solution replaces `rhs`.
fn banded_lu_solve(
    n: usize,
    d: usize,
    width: usize,
    band: &mut [f64],
    rhs: &mut [f64],
) -> Result<()> {
    // Forward elimination within the band
    for k in 0..n {
        let pivot = band[k * width + d];
        if pivot.abs() < 1e-12 {
            return Err(Error::Singular {
                context: "whittaker smoothing",
            });
        }
        for i in (k + 1)..(k + d + 1).min(n) {
            // A[i][k] sits at offset k + d - i
            let factor = band[i * width + (k + d - i)] / pivot;
            if factor == 0.0 {
                continue;
            }
            for j in (k + 1)..(k + d + 1).min(n) {
                band[i * width + (j + d - i)] -= factor * band[k * width + (j + d - k)];
            }
            rhs[i] -= factor * rhs[k];
        }
    }

    // Back substitution
    for i in (0..n).rev() {
        let mut sum = rhs[i];
        for j in (i + 1)..(i + d + 1).min(n) {
            sum -= band[i * width + (j + d - i)] * rhs[j];
        }
        rhs[i] = sum / band[i * width + d];
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_ramp(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| i as f64 * 0.5 + ((i * 7) % 5) as f64 - 2.0)
            .collect()
    }

    fn sum_sq_second_diff(data: &[f64]) -> f64 {
        data.windows(3)
            .map(|w| {
                let dd = w[2] - 2.0 * w[1] + w[0];
                dd * dd
            })
            .sum()
    }

    #[test]
    fn test_difference_coefficients() {
        assert_eq!(difference_coefficients(1), vec![-1.0, 1.0]);
        assert_eq!(difference_coefficients(2), vec![1.0, -2.0, 1.0]);
    }

    #[test]
    fn test_direct_lambda_zero_is_identity() {
        let data = noisy_ramp(40);
        let out = whittaker_direct(&data, &WhittakerParams { lambda: 0.0, order: 1 }).unwrap();
        for (a, b) in data.iter().zip(&out) {
            assert!((a - b).abs() < 1e-9, "identity violated: {a} vs {b}");
        }
    }

    #[test]
    fn test_direct_larger_lambda_is_smoother() {
        let data = noisy_ramp(60);
        let raw = sum_sq_second_diff(&data);
        let mut previous = raw;
        for lambda in [1.0, 16.0, 256.0] {
            let out = whittaker_direct(&data, &WhittakerParams { lambda, order: 1 }).unwrap();
            let rough = sum_sq_second_diff(&out);
            assert!(
                rough < previous,
                "lambda {lambda} did not smooth: {rough} vs {previous}"
            );
            previous = rough;
        }
    }

    #[test]
    fn test_direct_second_order_penalty() {
        let data = noisy_ramp(50);
        let out = whittaker_direct(&data, &WhittakerParams { lambda: 100.0, order: 2 }).unwrap();
        assert!(sum_sq_second_diff(&out) < sum_sq_second_diff(&data));
    }

    #[test]
    fn test_direct_rejects_missing() {
        let mut data = noisy_ramp(20);
        data[4] = f64::NAN;
        assert!(matches!(
            whittaker_direct(&data, &WhittakerParams::default()),
            Err(Error::MissingValues { .. })
        ));
    }

    #[test]
    fn test_weighted_matches_direct_when_gap_free() {
        let data = noisy_ramp(40);
        let params = WhittakerParams::default();
        let direct = whittaker_direct(&data, &params).unwrap();
        let weighted = whittaker(&data, &params).unwrap();
        for (a, b) in direct.iter().zip(&weighted) {
            assert!((a - b).abs() < 1e-6, "realizations disagree: {a} vs {b}");
        }
    }

    #[test]
    fn test_weighted_smooths_through_gap() {
        let mut data: Vec<f64> = (0..30).map(|i| (i as f64 * 0.4).sin() * 10.0).collect();
        data[12] = f64::NAN;
        data[13] = f64::NAN;
        let out = whittaker(&data, &WhittakerParams::default()).unwrap();
        assert_eq!(out.len(), 30);
        assert!(out[12].is_finite());
        assert!(out[13].is_finite());
        // The gap fill should stay near the neighbouring signal, far
        // from the solver sentinel
        assert!(out[12].abs() < 20.0);
    }

    #[test]
    fn test_short_series_rejected() {
        let data = vec![1.0, 2.0];
        assert!(whittaker_direct(&data, &WhittakerParams { lambda: 1.0, order: 2 }).is_err());
    }
}
