//! catseg-core - Core data structures for catalog page segmentation
//!
//! This crate provides the types every other crate in the workspace
//! shares:
//!
//! - [`Pix`] / [`PixMut`]: the raster container (binary, gray, RGBA)
//! - [`Block`]: an axis-aligned rectangle in page-pixel coordinates
//! - [`GridCell`]: a block with row/column indices assigned
//!
//! # Example
//!
//! ```
//! use catseg_core::{Pix, PixelDepth};
//!
//! // Create a new 8-bit grayscale image
//! let pix = Pix::new(640, 480, PixelDepth::Bit8).unwrap();
//! assert_eq!(pix.width(), 640);
//! assert_eq!(pix.height(), 480);
//! ```

pub mod block;
pub mod error;
pub mod pix;

pub use block::{Block, BlockKind, GridCell, sort_reading_order};
pub use error::{Error, Result};
pub use pix::{ImageFormat, Pix, PixMut, PixelDepth, color};
