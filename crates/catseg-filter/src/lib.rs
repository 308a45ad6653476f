//! catseg-filter - Image filtering operations
//!
//! This crate provides the filters the page detectors are built from:
//!
//! - Separable Gaussian blur
//! - Adaptive mean thresholding (dark ink becomes foreground)
//! - Sobel gradients and Canny edge detection

pub mod convolve;
pub mod edge;
mod error;
pub mod kernel;
pub mod threshold;

pub use error::{FilterError, FilterResult};
pub use kernel::Kernel;

pub use convolve::{convolve_sep, gaussian_blur};
pub use edge::{Gradients, canny, sobel_gradients};
pub use threshold::adaptive_threshold_mean;

use catseg_core::{Pix, PixelDepth};

/// Get an 8-bpp view of a gray or color image.
pub(crate) fn to_gray(pix: &Pix) -> FilterResult<Pix> {
    match pix.depth() {
        PixelDepth::Bit8 => Ok(pix.clone()),
        PixelDepth::Bit32 => Ok(pix.convert_to_8()?),
        d => Err(FilterError::UnsupportedDepth {
            expected: "8 or 32 bpp",
            actual: d.bits(),
        }),
    }
}
