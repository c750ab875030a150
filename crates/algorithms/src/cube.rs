//! Broadcast drivers over labeled N-D cubes
//!
//! Lift the per-series engines over every 1-D lane along the time axis
//! of a [`Cube`]. Lanes are independent, so they run through the
//! parallelism shim with nothing shared but the configuration; the
//! cube's shape and dimension names are untouched. Each driver comes
//! in an in-place and a copying variant, and the copying one is
//! implemented on top of the in-place one so both produce identical
//! values.

use ndarray::Axis;
use tracing::debug;
use verdis_core::{Cube, Result};

use crate::maybe_rayon::*;
use crate::outlier::{remove_outliers, OutlierMethod, ReplacePolicy};
use crate::smooth::{smooth, SmoothMethod};

/// Detect and replace outliers along the time axis, in place.
///
/// # Arguments
/// * `cube` - Labeled cube with a `"time"` dimension
/// * `method` - Detection strategy and its parameters
/// * `policy` - What to write over flagged samples
pub fn cube_remove_outliers_in_place(
    cube: &mut Cube,
    method: &OutlierMethod,
    policy: ReplacePolicy,
) -> Result<()> {
    let axis = Axis(cube.time_axis()?);
    let lanes: Vec<_> = cube.data_mut().lanes_mut(axis).into_iter().collect();
    debug!(
        lanes = lanes.len(),
        method = method.name(),
        "removing outliers along time axis"
    );

    lanes.into_par_iter().try_for_each(|mut lane| {
        let series = lane.to_vec();
        let cleaned = remove_outliers(&series, method, policy)?;
        for (dst, v) in lane.iter_mut().zip(cleaned) {
            *dst = v;
        }
        Ok(())
    })
}

/// Detect and replace outliers along the time axis, returning a new
/// cube and leaving the input untouched.
pub fn cube_remove_outliers(
    cube: &Cube,
    method: &OutlierMethod,
    policy: ReplacePolicy,
) -> Result<Cube> {
    let mut out = cube.clone();
    cube_remove_outliers_in_place(&mut out, method, policy)?;
    Ok(out)
}

/// Smooth every series along the time axis, in place.
///
/// # Arguments
/// * `cube` - Labeled cube with a `"time"` dimension
/// * `method` - Smoothing strategy and its parameters
/// * `fill_gaps` - Linearly interpolate missing samples first
pub fn cube_smooth_in_place(
    cube: &mut Cube,
    method: &SmoothMethod,
    fill_gaps: bool,
) -> Result<()> {
    let axis = Axis(cube.time_axis()?);
    let lanes: Vec<_> = cube.data_mut().lanes_mut(axis).into_iter().collect();
    debug!(
        lanes = lanes.len(),
        method = method.name(),
        fill_gaps,
        "smoothing along time axis"
    );

    lanes.into_par_iter().try_for_each(|mut lane| {
        let series = lane.to_vec();
        let smoothed = smooth(&series, method, fill_gaps)?;
        for (dst, v) in lane.iter_mut().zip(smoothed) {
            *dst = v;
        }
        Ok(())
    })
}

/// Smooth every series along the time axis, returning a new cube and
/// leaving the input untouched.
pub fn cube_smooth(cube: &Cube, method: &SmoothMethod, fill_gaps: bool) -> Result<Cube> {
    let mut out = cube.clone();
    cube_smooth_in_place(&mut out, method, fill_gaps)?;
    Ok(out)
}
