//! catseg-grid - Geometric reasoning over detected blocks
//!
//! - [`GridBuilder`]: cluster blocks into rows and order each row by x
//! - [`ProductSegmenter`]: group loose blocks into sequential product rows
//! - [`assign_images`]: pair product rows with their nearest photo
//!
//! Everything here is pure geometry on [`Block`](catseg_core::Block)
//! values; nothing touches pixels.

pub mod assign;
pub mod grid;
pub mod product;

pub use assign::{AssignPolicy, assign_images};
pub use grid::{DEFAULT_ROW_THRESHOLD, GridBuilder};
pub use product::{DEFAULT_PRODUCT_THRESHOLD, ProductRow, ProductSegmenter};
