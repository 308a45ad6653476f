//! Error types for the segmentation pipeline

use catseg_detect::DetectError;
use catseg_io::IoError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while segmenting pages
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Core library error
    #[error("core error: {0}")]
    Core(#[from] catseg_core::Error),

    /// Detector error that could not be treated as an empty result
    #[error("detection error: {0}")]
    Detect(#[from] DetectError),

    /// The page image could not be decoded
    #[error("failed to load image {}: {source}", path.display())]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// A crop or overlay could not be encoded or written
    #[error("failed to write image {}: {source}", path.display())]
    ImageWrite {
        path: PathBuf,
        #[source]
        source: IoError,
    },

    /// Another input file already claimed this page name
    #[error("page name '{page}' of {} is already used by {}", path.display(), first.display())]
    DuplicatePage {
        page: String,
        path: PathBuf,
        first: PathBuf,
    },

    /// The input directory does not exist
    #[error("input directory not found: {}", .0.display())]
    InputDirNotFound(PathBuf),

    /// The output directory could not be created
    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file could not be read or parsed
    #[error("cannot load configuration {}: {message}", path.display())]
    ConfigLoad { path: PathBuf, message: String },

    /// A configuration value is out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The worker pool could not be started
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// Record serialization error
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Filesystem error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;
