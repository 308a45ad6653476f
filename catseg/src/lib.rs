//! catseg - Catalog page segmentation
//!
//! Takes scanned or exported catalog pages and produces, per page, a
//! row/column grid of table cells, cropped cell images, detected product
//! photos, and product rows paired with their nearest photo.
//!
//! # Overview
//!
//! - Imaging primitives: raster container, filters, binary morphology,
//!   connected components
//! - Detectors: rule-based table grid, optional layout model, edge-blob
//!   fallback, photo regions
//! - Geometry: grid reconstruction, product rows, photo assignment
//! - Pipeline: per-page orchestration, crops, JSON records, batch runs
//!
//! # Example
//!
//! ```no_run
//! use catseg::pipeline::{PageProcessor, SegmenterConfig};
//! use std::path::Path;
//!
//! let processor = PageProcessor::new(&SegmenterConfig::default()).unwrap();
//! let report = processor
//!     .process_dir(Path::new("pages"), Path::new("out"))
//!     .unwrap();
//! println!("{}", report);
//! ```

// Re-export core types (primary data structures used everywhere)
pub use catseg_core::*;

// Re-export domain crates as modules to avoid name conflicts
pub use catseg_detect as detect;
pub use catseg_filter as filter;
pub use catseg_grid as grid;
pub use catseg_io as io;
pub use catseg_morph as morph;
pub use catseg_pipeline as pipeline;
pub use catseg_region as region;
