//! Error types for Verdis

use thiserror::Error;

/// Main error type for Verdis operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Unknown {kind} strategy: {name:?}")]
    UnknownStrategy { kind: &'static str, name: String },

    #[error("{mode} cannot handle missing values; fill gaps first or pick a gap-tolerant mode")]
    MissingValues { mode: &'static str },

    #[error("{mode} produces no replacement series; use the drop policy instead")]
    NoReplacement { mode: &'static str },

    #[error("Unknown dimension: {name:?}")]
    UnknownDimension { name: String },

    #[error("Duplicate dimension: {name:?}")]
    DuplicateDimension { name: String },

    #[error("Dimension count mismatch: {expected} names for an array of rank {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Singular system in {context}")]
    Singular { context: &'static str },

    #[error("Invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    #[error("Algorithm error: {0}")]
    Algorithm(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Verdis operations
pub type Result<T> = std::result::Result<T, Error>;
