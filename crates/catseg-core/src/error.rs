//! Error types for catseg-core
//!
//! Raised by raster construction, pixel access, clipping, and the binary
//! combination operations. Every other crate wraps this type with
//! `#[from]`.

use thiserror::Error;

/// catseg-core error type
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid image dimensions
    #[error("invalid image dimensions: {width}x{height}")]
    InvalidDimension { width: u32, height: u32 },

    /// Incompatible image sizes
    #[error("incompatible image sizes: {0}x{1} vs {2}x{3}")]
    IncompatibleSizes(u32, u32, u32, u32),

    /// Unsupported pixel depth for this operation
    #[error("unsupported pixel depth: {0} bpp")]
    UnsupportedDepth(u32),

    /// Pixel coordinates outside the image
    #[error("pixel ({x}, {y}) is outside a {width}x{height} image")]
    OutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    /// Invalid parameter value
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Raw data length does not match the declared geometry
    #[error("data length mismatch: expected {expected} bytes, got {actual}")]
    DataLength { expected: usize, actual: usize },
}

/// Result type alias for core operations
pub type Result<T> = std::result::Result<T, Error>;
