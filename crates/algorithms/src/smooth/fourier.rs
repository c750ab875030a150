//! Spectral smoothing by harmonic truncation
//!
//! Transforms the series to the frequency domain, zeroes every
//! harmonic above the kept count (or above an absolute frequency
//! cutoff), and transforms back. Truncation is Hermitian-symmetric, so
//! the reconstruction of a real series is real. Requires gap-free,
//! equally spaced samples.

use num_complex::Complex;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};
use verdis_core::{Error, Result};

/// Parameters for Fourier smoothing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FourierParams {
    /// Number of harmonics kept, counting the constant term
    /// (default 4); 1 keeps only the series mean
    pub n_harmonics: usize,
    /// Absolute frequency cutoff in cycles per sample; when set it
    /// replaces the harmonic count
    pub cutoff: Option<f64>,
}

impl Default for FourierParams {
    fn default() -> Self {
        Self {
            n_harmonics: 4,
            cutoff: None,
        }
    }
}

/// Smooth a series by truncating its Fourier spectrum.
///
/// Applying the same truncation twice is a projection: the second pass
/// returns the first pass unchanged.
pub fn fourier_smooth(data: &[f64], params: &FourierParams) -> Result<Vec<f64>> {
    if let Some(cutoff) = params.cutoff
        && !(cutoff >= 0.0)
    {
        return Err(Error::InvalidParameter {
            name: "cutoff",
            value: cutoff.to_string(),
            reason: "frequency cutoff must be non-negative".into(),
        });
    }
    if data.iter().any(|v| v.is_nan()) {
        return Err(Error::MissingValues { mode: "fourier" });
    }

    let n = data.len();
    if n < 2 {
        return Ok(data.to_vec());
    }

    let mut planner = FftPlanner::new();
    let mut buf: Vec<Complex<f64>> = data.iter().map(|&v| Complex::new(v, 0.0)).collect();
    planner.plan_fft_forward(n).process(&mut buf);

    for (k, bin) in buf.iter_mut().enumerate() {
        // Harmonic index folds the negative-frequency half back
        let harmonic = k.min(n - k);
        let drop = match params.cutoff {
            Some(cutoff) => harmonic as f64 / n as f64 > cutoff,
            None => harmonic >= params.n_harmonics,
        };
        if drop {
            *bin = Complex::new(0.0, 0.0);
        }
    }

    planner.plan_fft_inverse(n).process(&mut buf);
    let scale = 1.0 / n as f64;
    Ok(buf.into_iter().map(|c| c.re * scale).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_sine(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64 / n as f64;
                (2.0 * std::f64::consts::PI * t).sin() + ((i * 7) % 5) as f64 * 0.05
            })
            .collect()
    }

    fn variance(data: &[f64]) -> f64 {
        let mean = data.iter().sum::<f64>() / data.len() as f64;
        data.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / data.len() as f64
    }

    #[test]
    fn test_fourier_is_projection() {
        let data = noisy_sine(48);
        let params = FourierParams::default();
        let once = fourier_smooth(&data, &params).unwrap();
        let twice = fourier_smooth(&once, &params).unwrap();
        for (a, b) in once.iter().zip(&twice) {
            assert!((a - b).abs() < 1e-9, "projection violated: {a} vs {b}");
        }
    }

    #[test]
    fn test_fourier_reduces_noise() {
        let data = noisy_sine(64);
        let out = fourier_smooth(&data, &FourierParams::default()).unwrap();
        let raw_rough: f64 = data.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        let out_rough: f64 = out.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
        assert!(out_rough < raw_rough);
    }

    #[test]
    fn test_fourier_single_harmonic_is_mean() {
        let data = vec![1.0, 5.0, 3.0, 7.0, 2.0, 6.0, 4.0, 8.0];
        let out = fourier_smooth(
            &data,
            &FourierParams {
                n_harmonics: 1,
                cutoff: None,
            },
        )
        .unwrap();
        let mean = data.iter().sum::<f64>() / data.len() as f64;
        for v in out {
            assert!((v - mean).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fourier_keep_all_is_identity() {
        let data = noisy_sine(32);
        let out = fourier_smooth(
            &data,
            &FourierParams {
                n_harmonics: 32,
                cutoff: None,
            },
        )
        .unwrap();
        for (a, b) in data.iter().zip(&out) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fourier_cutoff_mode_reduces_variance() {
        let data = noisy_sine(64);
        let out = fourier_smooth(
            &data,
            &FourierParams {
                n_harmonics: 4,
                cutoff: Some(0.05),
            },
        )
        .unwrap();
        assert!(variance(&out) < variance(&data));
    }

    #[test]
    fn test_fourier_rejects_missing() {
        let mut data = noisy_sine(16);
        data[3] = f64::NAN;
        assert!(matches!(
            fourier_smooth(&data, &FourierParams::default()),
            Err(Error::MissingValues { .. })
        ));
    }
}
