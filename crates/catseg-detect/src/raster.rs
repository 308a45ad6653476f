//! Edge-blob extraction shared by the fallback and photo detectors

use crate::{DetectError, DetectResult, PageImage};
use catseg_core::{Block, Pix};
use catseg_filter::{canny, gaussian_blur};
use catseg_morph::{Sel, dilate_iterated};
use catseg_region::external_bounding_boxes;
use serde::{Deserialize, Serialize};

/// Blur, Canny, and dilation settings for edge-blob extraction
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeOptions {
    /// Gaussian window size (odd; 1 disables the blur)
    pub blur_size: u32,
    /// Gaussian sigma; 0 derives it from the window size
    pub blur_sigma: f32,
    /// Canny hysteresis low threshold
    pub canny_low: f32,
    /// Canny hysteresis high threshold
    pub canny_high: f32,
    /// Side of the square dilation brick
    pub dilate_size: u32,
    /// Dilation passes
    pub dilate_iterations: u32,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            blur_size: 5,
            blur_sigma: 0.0,
            canny_low: 50.0,
            canny_high: 150.0,
            dilate_size: 5,
            dilate_iterations: 2,
        }
    }
}

impl EdgeOptions {
    /// Check the settings before running.
    pub fn validate(&self) -> DetectResult<()> {
        if self.blur_size > 1 && self.blur_size % 2 == 0 {
            return Err(DetectError::InvalidOptions(format!(
                "blur_size must be odd, got {}",
                self.blur_size
            )));
        }
        if self.canny_low > self.canny_high {
            return Err(DetectError::InvalidOptions(format!(
                "canny_low {} exceeds canny_high {}",
                self.canny_low, self.canny_high
            )));
        }
        if self.dilate_size == 0 {
            return Err(DetectError::InvalidOptions(
                "dilate_size must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Raw edges plus the outer boxes of the dilated edge mask
pub(crate) struct EdgeRegions {
    pub edges: Pix,
    pub boxes: Vec<Block>,
}

pub(crate) fn edge_regions(page: &PageImage, opts: &EdgeOptions) -> DetectResult<EdgeRegions> {
    opts.validate()?;
    let gray = page.gray()?;
    let blurred = gaussian_blur(&gray, opts.blur_size, opts.blur_sigma)?;
    let edges = canny(&blurred, opts.canny_low, opts.canny_high)?;
    let sel = Sel::create_brick(opts.dilate_size, opts.dilate_size)?;
    let merged = dilate_iterated(&edges, &sel, opts.dilate_iterations)?;
    let boxes = external_bounding_boxes(&merged)?;
    Ok(EdgeRegions { edges, boxes })
}
