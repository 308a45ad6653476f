//! catseg-detect - Region detectors for catalog pages
//!
//! Three competing strategies propose table cells for a page:
//!
//! - [`TableDetector`] (`line-grid`): ruling lines recovered by morphology
//! - [`LayoutDetector`] (`layout-model`): a pretrained document-layout
//!   model behind the [`LayoutModel`] trait, optional at runtime
//! - [`FallbackDetector`] (`fallback`): edge blobs, always available
//!
//! [`select`] reconciles their outputs by strict priority. Product photos
//! are found separately by [`ImageDetector`].
//!
//! # Examples
//!
//! ```
//! use catseg_core::{Pix, PixelDepth};
//! use catseg_detect::{Detector, PageImage, TableDetector};
//!
//! let blank = Pix::new_filled(400, 300, PixelDepth::Bit8, 255).unwrap();
//! let page = PageImage::from_pix(blank, "blank");
//! let result = TableDetector::default().detect(&page).unwrap();
//! assert!(result.blocks.is_empty());
//! ```

mod error;
pub mod fallback;
pub mod layout;
mod page;
pub mod photo;
mod raster;
pub mod selector;
pub mod table;

pub use error::{DetectError, DetectResult};
pub use fallback::{FallbackDetector, FallbackOptions};
pub use layout::{
    CommandLayoutModel, LayoutAnalysis, LayoutDetector, LayoutModel, LayoutModelConfig,
    LayoutRegion, LayoutUnavailable,
};
pub use page::PageImage;
pub use photo::{ImageDetector, ImageOptions};
pub use raster::EdgeOptions;
pub use selector::{Selection, select};
pub use table::{TableDetector, TableOptions, TableVariant};

use catseg_core::Block;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Instant;

/// Which detector produced a set of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Rule-based table detector
    LineGrid,
    /// Pretrained layout model
    LayoutModel,
    /// Edge-blob fallback
    Fallback,
}

impl Strategy {
    /// Name used in records and logs
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::LineGrid => "line-grid",
            Strategy::LayoutModel => "layout-model",
            Strategy::Fallback => "fallback",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detector's output for one page
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// Producing strategy
    pub strategy: Strategy,
    /// Proposed rectangles in page coordinates
    pub blocks: Vec<Block>,
}

impl DetectionResult {
    /// Create a result
    pub fn new(strategy: Strategy, blocks: Vec<Block>) -> Self {
        Self { strategy, blocks }
    }

    /// An empty result for `strategy`
    pub fn empty(strategy: Strategy) -> Self {
        Self::new(strategy, Vec::new())
    }

    /// Number of proposed rectangles
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// True when nothing was proposed
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A table-cell proposal strategy
///
/// Implementations must not mutate the page and must be shareable across
/// threads; the pipeline runs each detector on its own worker.
pub trait Detector: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// The strategy tag attached to this detector's results
    fn strategy(&self) -> Strategy;

    /// Propose rectangles for `page`, sorted by `(y, x)`
    fn detect(&self, page: &PageImage) -> DetectResult<DetectionResult>;

    /// Like [`detect`](Self::detect), but stop with [`DetectError::Timeout`]
    /// at the first checkpoint after `deadline`.
    ///
    /// Detectors without checkpoints run to completion.
    fn detect_until(
        &self,
        page: &PageImage,
        _deadline: Instant,
    ) -> DetectResult<DetectionResult> {
        self.detect(page)
    }
}
