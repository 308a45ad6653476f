//! catseg-morph - Binary morphology
//!
//! This crate provides:
//!
//! - Structuring elements (SEL): bricks, horizontal and vertical lines
//! - Binary erosion, dilation, opening, closing
//! - Iterated dilation, used to merge edge fragments into regions
//!
//! Pixels outside the image are treated as background by every operation.

pub mod binary;
mod error;
pub mod sel;

pub use binary::{dilate, dilate_brick, dilate_iterated, erode, open};
pub use error::{MorphError, MorphResult};
pub use sel::{Sel, SelElement};
