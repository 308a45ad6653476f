//! Error types for catseg-detect

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while running a detector
#[derive(Debug, Error)]
pub enum DetectError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] catseg_core::Error),

    /// Image I/O error
    #[error("io error: {0}")]
    Io(#[from] catseg_io::IoError),

    /// Filtering error
    #[error("filter error: {0}")]
    Filter(#[from] catseg_filter::FilterError),

    /// Morphology error
    #[error("morphology error: {0}")]
    Morph(#[from] catseg_morph::MorphError),

    /// Region analysis error
    #[error("region error: {0}")]
    Region(#[from] catseg_region::RegionError),

    /// Layout model inference failed
    #[error("layout model '{model}' failed: {message}")]
    Model { model: String, message: String },

    /// A detector or model process exceeded its deadline
    #[error("{what} timed out after {after:?}")]
    Timeout { what: String, after: Duration },

    /// Invalid detector options
    #[error("invalid options: {0}")]
    InvalidOptions(String),
}

/// Result type for detector operations
pub type DetectResult<T> = Result<T, DetectError>;
