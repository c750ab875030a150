//! # Verdis Core
//!
//! Core types for the Verdis time-series preprocessing library.
//!
//! This crate provides:
//! - `Cube`: labeled N-D array of per-pixel time series
//! - Shared error and result types
//!
//! The algorithms that operate on these types live in
//! `verdis-algorithms`.

pub mod cube;
pub mod error;

pub use cube::{Cube, CubeStatistics, TIME_DIM};
pub use error::{Error, Result};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cube::{Cube, CubeStatistics, TIME_DIM};
    pub use crate::error::{Error, Result};
}
