//! Linear interpolation over missing samples

/// Fill missing samples by linear interpolation against the positions
/// of known samples.
///
/// Gaps between two known samples are filled linearly. Positions before
/// the first known sample or after the last take that boundary value
/// (no linear extrapolation). A series with no known sample at all is
/// returned unchanged.
pub fn interpolate_missing(data: &[f64]) -> Vec<f64> {
    let known: Vec<usize> = data
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, _)| i)
        .collect();

    let mut out = data.to_vec();
    if known.is_empty() {
        return out;
    }

    let first = known[0];
    let last = known[known.len() - 1];

    for (i, slot) in out.iter_mut().enumerate() {
        if !slot.is_nan() {
            continue;
        }
        if i < first {
            *slot = data[first];
        } else if i > last {
            *slot = data[last];
        } else {
            // Neighbouring known samples around the gap
            let hi_pos = known.partition_point(|&k| k < i);
            let k1 = known[hi_pos];
            let k0 = known[hi_pos - 1];
            let frac = (i - k0) as f64 / (k1 - k0) as f64;
            *slot = data[k0] * (1.0 - frac) + data[k1] * frac;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolate_fully_observed_unchanged() {
        let data = vec![1.0, 2.0, 3.0, 4.0];
        assert_eq!(interpolate_missing(&data), data);
    }

    #[test]
    fn test_interpolate_all_missing_unchanged() {
        let data = vec![f64::NAN; 6];
        let out = interpolate_missing(&data);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_interpolate_interior_gap() {
        let data = vec![0.0, f64::NAN, f64::NAN, 3.0];
        let out = interpolate_missing(&data);
        assert!((out[1] - 1.0).abs() < 1e-12);
        assert!((out[2] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_clamps_at_edges() {
        let data = vec![f64::NAN, 2.0, f64::NAN, 4.0, f64::NAN];
        let out = interpolate_missing(&data);
        assert!((out[0] - 2.0).abs() < 1e-12);
        assert!((out[2] - 3.0).abs() < 1e-12);
        assert!((out[4] - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_interpolate_single_known_sample() {
        let data = vec![f64::NAN, f64::NAN, 7.0, f64::NAN];
        let out = interpolate_missing(&data);
        assert!(out.iter().all(|&v| (v - 7.0).abs() < 1e-12));
    }
}
