//! From-scratch isolation forest over sliding windows
//!
//! Builds fixed-width sliding windows over the valid samples of a
//! series and isolates whole windows instead of single values, so a
//! point is judged against the local shape of the series around it.
//! Each tree partitions a random subset of windows by repeatedly
//! splitting on a uniformly random feature (offset within the window)
//! at a uniformly random threshold inside that feature's observed
//! range. Windows that separate from the bulk after only a few splits
//! earn short paths and therefore high anomaly scores.
//!
//! Trees are index-addressed arenas built with an explicit work stack
//! and discarded after their path lengths are read back; nothing is
//! kept between calls.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use verdis_core::{Error, Result};

use crate::outlier::Detection;

/// Parameters for the sliding-window isolation forest
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IsoForestTsParams {
    /// Sliding window width in samples (default 5)
    pub window: usize,
    /// Number of trees (default 100)
    pub n_trees: usize,
    /// Depth budget per tree (default 10)
    pub max_depth: usize,
    /// Fraction of windows sampled (with replacement) per tree
    /// (default 0.5)
    pub sample_frac: f64,
    /// Flag windows whose scaled score is at or below this (default 0.25)
    pub low_thresh: f64,
    /// Flag windows whose scaled score is at or above this (default 0.75)
    pub high_thresh: f64,
    /// RNG seed; `None` draws one from the OS
    pub seed: Option<u64>,
}

impl Default for IsoForestTsParams {
    fn default() -> Self {
        Self {
            window: 5,
            n_trees: 100,
            max_depth: 10,
            sample_frac: 0.5,
            low_thresh: 0.25,
            high_thresh: 0.75,
            seed: None,
        }
    }
}

/// One node of an isolation tree arena.
///
/// Internal nodes carry the split and child indices; leaves carry the
/// window ids that ended up in them.
struct Node {
    left: Option<usize>,
    right: Option<usize>,
    split_feature: usize,
    split_value: f64,
    members: Vec<usize>,
}

impl Node {
    fn unsplit() -> Self {
        Self {
            left: None,
            right: None,
            split_feature: 0,
            split_value: f64::NAN,
            members: Vec::new(),
        }
    }
}

/// Build one isolation tree over the sampled window ids.
///
/// `x` is the gap-compressed series; window id `w` covers
/// `x[w..w + window]`. A node becomes a leaf when it holds at most one
/// window or the depth budget runs out.
fn build_tree(
    x: &[f64],
    window: usize,
    sample: Vec<usize>,
    max_depth: usize,
    rng: &mut StdRng,
) -> Vec<Node> {
    let mut arena = vec![Node::unsplit()];
    let mut work = vec![(0usize, sample, max_depth)];

    while let Some((idx, members, depth)) = work.pop() {
        if members.len() <= 1 || depth == 0 {
            arena[idx].members = members;
            continue;
        }

        let feature = rng.random_range(0..window);
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for &w in &members {
            let v = x[w + feature];
            lo = lo.min(v);
            hi = hi.max(v);
        }
        let split_value = if hi > lo { rng.random_range(lo..hi) } else { lo };

        let (left_members, right_members): (Vec<usize>, Vec<usize>) = members
            .into_iter()
            .partition(|&w| x[w + feature] < split_value);

        let left = arena.len();
        arena.push(Node::unsplit());
        let right = arena.len();
        arena.push(Node::unsplit());

        arena[idx].left = Some(left);
        arena[idx].right = Some(right);
        arena[idx].split_feature = feature;
        arena[idx].split_value = split_value;

        work.push((left, left_members, depth - 1));
        work.push((right, right_members, depth - 1));
    }

    arena
}

/// Path length per window id for one tree: the leaf counts 1, plus one
/// for every ancestor up to the root. Windows absent from the tree stay
/// `None`. Iterative traversal over the arena.
fn path_lengths(arena: &[Node], n_windows: usize) -> Vec<Option<u32>> {
    let mut paths = vec![None; n_windows];
    let mut stack = vec![(0usize, 1u32)];

    while let Some((idx, depth)) = stack.pop() {
        let node = &arena[idx];
        match (node.left, node.right) {
            (Some(l), Some(r)) => {
                stack.push((l, depth + 1));
                stack.push((r, depth + 1));
            }
            _ => {
                for &w in &node.members {
                    paths[w] = Some(depth);
                }
            }
        }
    }

    paths
}

/// Detect outliers by isolating sliding windows of the series.
///
/// Anomaly score per window is the reciprocal of its average path
/// length across the trees that sampled it, min-max scaled to [0, 1];
/// a window is flagged when the scaled score is `<= low_thresh` or
/// `>= high_thresh`. Each flag lands on the window's center sample.
/// Missing samples are skipped when forming windows and are never
/// flagged, and the half-window at each end of the series carries no
/// score. No replacement series is produced; combine with the `drop`
/// policy.
pub fn iso_forest_ts(data: &[f64], params: &IsoForestTsParams) -> Result<Detection> {
    if params.window == 0 {
        return Err(Error::InvalidParameter {
            name: "window",
            value: params.window.to_string(),
            reason: "window must be at least 1 sample".into(),
        });
    }
    if params.n_trees == 0 {
        return Err(Error::InvalidParameter {
            name: "n_trees",
            value: params.n_trees.to_string(),
            reason: "ensemble needs at least one tree".into(),
        });
    }
    if !(params.sample_frac > 0.0 && params.sample_frac <= 1.0) {
        return Err(Error::InvalidParameter {
            name: "sample_frac",
            value: params.sample_frac.to_string(),
            reason: "sampling fraction must be in (0, 1]".into(),
        });
    }
    if params.low_thresh > params.high_thresh {
        return Err(Error::InvalidParameter {
            name: "low_thresh/high_thresh",
            value: format!("{}/{}", params.low_thresh, params.high_thresh),
            reason: "low threshold must not exceed the high one".into(),
        });
    }

    let mut outliers = vec![false; data.len()];

    // Gap-compress the series; window ids index into `x`
    let valid_idx: Vec<usize> = data
        .iter()
        .enumerate()
        .filter(|(_, v)| !v.is_nan())
        .map(|(i, _)| i)
        .collect();
    let x: Vec<f64> = valid_idx.iter().map(|&i| data[i]).collect();

    if x.len() < params.window {
        return Ok(Detection {
            outliers,
            replacement: None,
        });
    }
    let n_windows = x.len() - params.window + 1;
    let n_sample = ((n_windows as f64 * params.sample_frac) as usize).max(1);

    let mut rng = match params.seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    };

    let mut path_sum = vec![0u64; n_windows];
    let mut path_count = vec![0u64; n_windows];

    for _ in 0..params.n_trees {
        let sample: Vec<usize> = (0..n_sample)
            .map(|_| rng.random_range(0..n_windows))
            .collect();
        let arena = build_tree(&x, params.window, sample, params.max_depth, &mut rng);
        for (w, path) in path_lengths(&arena, n_windows).into_iter().enumerate() {
            if let Some(p) = path {
                path_sum[w] += p as u64;
                path_count[w] += 1;
            }
        }
    }

    // Reciprocal average path length; a window no tree ever sampled
    // stays unscored
    let raw: Vec<f64> = path_sum
        .iter()
        .zip(&path_count)
        .map(|(&sum, &count)| {
            if count > 0 {
                count as f64 / sum as f64
            } else {
                f64::NAN
            }
        })
        .collect();

    let scaled = min_max_scale(&raw);

    // A window's score lands on its center sample; the half-window at
    // each series end stays unscored
    let half = params.window / 2;
    for (w, &score) in scaled.iter().enumerate() {
        if score <= params.low_thresh || score >= params.high_thresh {
            outliers[valid_idx[w + half]] = true;
        }
    }

    Ok(Detection {
        outliers,
        replacement: None,
    })
}

/// Scale finite values to [0, 1]; an all-equal vector scales to 0.
fn min_max_scale(values: &[f64]) -> Vec<f64> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        if v.is_nan() {
            continue;
        }
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let range = hi - lo;
    values
        .iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else if range > 0.0 {
                (v - lo) / range
            } else {
                0.0
            }
        })
        .collect()
}
