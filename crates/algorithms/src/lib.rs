//! # Verdis Algorithms
//!
//! Time-series preprocessing for vegetation-index imagery stacks.
//!
//! ## Available Algorithm Categories
//!
//! - **series**: rolling statistics, linear gap interpolation
//! - **outlier**: rolling z-score, rolling IQR, isolation forests
//! - **smooth**: Whittaker, Fourier, Gaussian kernel smoothing
//! - **cube**: broadcast of either engine along the time axis of a
//!   labeled N-D cube
//!
//! Strategies are closed enums selectable by registry name; see
//! [`outlier::DETECTORS`] and [`smooth::SMOOTHERS`].

pub mod cube;
pub mod maybe_rayon;
pub mod outlier;
pub mod series;
pub mod smooth;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cube::{
        cube_remove_outliers, cube_remove_outliers_in_place, cube_smooth, cube_smooth_in_place,
    };
    pub use crate::outlier::{
        remove_outliers, Detection, IqrParams, IsoForestParams, IsoForestTsParams, OutlierMethod,
        ReplacePolicy, ZscoreParams,
    };
    pub use crate::series::{interpolate_missing, rolling_mean, rolling_quantile, rolling_std};
    pub use crate::smooth::{smooth, FourierParams, RbfParams, SmoothMethod, WhittakerParams};
    pub use verdis_core::prelude::*;
}
