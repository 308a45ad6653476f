//! Page image I/O errors
//!
//! The `png` and `jpeg-decoder` errors are flattened into strings here, so
//! the detectors and the pipeline see a single error type for every page
//! they fail to read or crop they fail to write.

use thiserror::Error;

/// Error reading a page or writing a crop
#[derive(Error, Debug)]
pub enum IoError {
    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The image data is structurally invalid
    #[error("invalid image data: {0}")]
    InvalidData(String),

    /// A format-specific decoder returned an error
    #[error("decode error: {0}")]
    DecodeError(String),

    /// A format-specific encoder returned an error
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Raster construction failed
    #[error("core error: {0}")]
    Core(#[from] catseg_core::Error),
}

/// Convenience alias for I/O results.
pub type IoResult<T> = Result<T, IoError>;
