//! Generic 1-D series primitives
//!
//! Building blocks shared by the outlier and smoothing engines:
//! centered rolling statistics and linear gap interpolation. All
//! routines treat `f64::NAN` as a missing sample.

pub mod interpolate;
pub mod rolling;

pub use interpolate::interpolate_missing;
pub use rolling::{rolling_mean, rolling_quantile, rolling_std};
