//! Edge-blob fallback detector
//!
//! Blur, Canny, dilate, and keep the outer boxes that are large enough.
//! Output is sorted by `(y, x)` with a stable sort, so boxes sharing a
//! top-left corner keep their discovery order; row grouping downstream
//! depends on that ordering.

use crate::raster::edge_regions;
use crate::{
    DetectError, DetectResult, DetectionResult, Detector, EdgeOptions, PageImage, Strategy,
};
use catseg_core::sort_reading_order;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Fallback detector settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackOptions {
    /// Edge extraction settings
    pub edges: EdgeOptions,
    /// Minimum box width (inclusive)
    pub min_width: i32,
    /// Minimum box height (inclusive)
    pub min_height: i32,
}

impl Default for FallbackOptions {
    fn default() -> Self {
        Self {
            edges: EdgeOptions::default(),
            min_width: 80,
            min_height: 60,
        }
    }
}

impl FallbackOptions {
    /// Set the minimum box size
    pub fn with_min_size(mut self, min_width: i32, min_height: i32) -> Self {
        self.min_width = min_width;
        self.min_height = min_height;
        self
    }

    /// Check the settings before running.
    pub fn validate(&self) -> DetectResult<()> {
        self.edges.validate()?;
        if self.min_width < 0 || self.min_height < 0 {
            return Err(DetectError::InvalidOptions(format!(
                "minimum box size must be non-negative, got {}x{}",
                self.min_width, self.min_height
            )));
        }
        Ok(())
    }
}

/// Edge-blob detector (`fallback`)
#[derive(Debug, Clone, Default)]
pub struct FallbackDetector {
    options: FallbackOptions,
}

impl FallbackDetector {
    /// Create a detector with the given options
    pub fn new(options: FallbackOptions) -> Self {
        Self { options }
    }
}

impl Detector for FallbackDetector {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn strategy(&self) -> Strategy {
        Strategy::Fallback
    }

    fn detect(&self, page: &PageImage) -> DetectResult<DetectionResult> {
        let o = &self.options;
        let regions = edge_regions(page, &o.edges)?;
        let mut blocks: Vec<_> = regions
            .boxes
            .into_iter()
            .filter(|b| b.w >= o.min_width && b.h >= o.min_height)
            .collect();
        sort_reading_order(&mut blocks);
        debug!(page = page.name(), blocks = blocks.len(), "fallback detector");
        Ok(DetectionResult::new(Strategy::Fallback, blocks))
    }
}
