//! catseg-pipeline - Page segmentation orchestration
//!
//! [`PageSegmenter`] takes one page through detection, strategy selection,
//! gridding, cropping, and record writing. [`PageProcessor`] runs it over
//! a directory on a bounded worker pool and reports what happened.
//!
//! # Output layout
//!
//! ```text
//! <output>/
//!   catalog_p01.json
//!   cells/
//!     catalog_p01_row0_col0.png
//!     catalog_p01_img0.png
//! ```

pub mod config;
mod error;
pub mod extract;
pub mod overlay;
pub mod processor;
pub mod record;
pub mod segmenter;

pub use config::SegmenterConfig;
pub use error::{PipelineError, PipelineResult};
pub use extract::{
    CellExtractor, CropFailure, ExtractedCell, ExtractedPhoto, Extraction, crop, crop_region,
};
pub use processor::{BatchReport, PageFailure, PageProcessor, claim_page_names, list_pages};
pub use record::{CellRecord, PhotoRecord, ProductRecord, SegmentationRecord};
pub use segmenter::{CELLS_DIR, PageOutcome, PageSegmentation, PageSegmenter, Stage};
