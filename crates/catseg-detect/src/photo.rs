//! Product photo detector
//!
//! Uses the same edge-blob pipeline as the fallback detector, but keeps
//! only boxes shaped and textured like photographs: both sides above a
//! minimum, aspect ratio inside an open range, and enough edge pixels per
//! unit area to rule out empty frames.

use crate::raster::edge_regions;
use crate::{DetectError, DetectResult, EdgeOptions, PageImage};
use catseg_core::{Block, sort_reading_order};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Photo detector settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageOptions {
    /// Edge extraction settings
    pub edges: EdgeOptions,
    /// Width must be strictly greater
    pub min_width: i32,
    /// Height must be strictly greater
    pub min_height: i32,
    /// Aspect ratio `w / h` must be strictly greater
    pub min_aspect: f64,
    /// Aspect ratio `w / h` must be strictly smaller
    pub max_aspect: f64,
    /// Minimum edge pixels per box pixel
    pub min_edge_density: f64,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            edges: EdgeOptions::default(),
            min_width: 100,
            min_height: 100,
            min_aspect: 0.2,
            max_aspect: 6.0,
            min_edge_density: 0.01,
        }
    }
}

impl ImageOptions {
    /// Set the open aspect-ratio range
    pub fn with_aspect_range(mut self, min: f64, max: f64) -> Self {
        self.min_aspect = min;
        self.max_aspect = max;
        self
    }

    /// Set the minimum edge density
    pub fn with_min_edge_density(mut self, density: f64) -> Self {
        self.min_edge_density = density;
        self
    }

    /// Check the settings before running.
    pub fn validate(&self) -> DetectResult<()> {
        if self.min_aspect >= self.max_aspect {
            return Err(DetectError::InvalidOptions(format!(
                "empty aspect range ({}, {})",
                self.min_aspect, self.max_aspect
            )));
        }
        self.edges.validate()
    }

    fn accepts(&self, b: &Block, edge_pixels: u64) -> bool {
        if b.w <= self.min_width || b.h <= self.min_height {
            return false;
        }
        let Some(aspect) = b.aspect_ratio() else {
            return false;
        };
        if aspect <= self.min_aspect || aspect >= self.max_aspect {
            return false;
        }
        edge_pixels as f64 / b.area() as f64 >= self.min_edge_density
    }
}

/// Product photo detector
///
/// Not a selector strategy: its blocks feed the image assigner and the
/// photo cropper instead of the cell grid.
#[derive(Debug, Clone, Default)]
pub struct ImageDetector {
    options: ImageOptions,
}

impl ImageDetector {
    /// Create a detector with the given options
    pub fn new(options: ImageOptions) -> Self {
        Self { options }
    }

    /// Find photo-like regions, sorted by `(y, x)`
    pub fn detect(&self, page: &PageImage) -> DetectResult<Vec<Block>> {
        self.options.validate()?;
        let regions = edge_regions(page, &self.options.edges)?;
        let mut photos: Vec<_> = regions
            .boxes
            .into_iter()
            .filter(|b| {
                self.options
                    .accepts(b, regions.edges.count_pixels_in_block(b))
            })
            .collect();
        sort_reading_order(&mut photos);
        debug!(page = page.name(), photos = photos.len(), "image detector");
        Ok(photos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_shape_rules() {
        let o = ImageOptions::default();
        let dense = 1_000_000;
        assert!(o.accepts(&Block::new_unchecked(0, 0, 200, 150), dense));
        // exactly 100 is not "greater than 100"
        assert!(!o.accepts(&Block::new_unchecked(0, 0, 100, 150), dense));
        // 700 / 110 > 6
        assert!(!o.accepts(&Block::new_unchecked(0, 0, 700, 110), dense));
        // 101 / 600 < 0.2
        assert!(!o.accepts(&Block::new_unchecked(0, 0, 101, 600), dense));
        // 200 edge pixels on 30000 px is below 1%
        assert!(!o.accepts(&Block::new_unchecked(0, 0, 200, 150), 200));
    }

    #[test]
    fn test_validate_aspect_range() {
        assert!(
            ImageOptions::default()
                .with_aspect_range(3.0, 1.0)
                .validate()
                .is_err()
        );
    }
}
