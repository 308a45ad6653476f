//! catseg-test - Regression test helpers for catseg
//!
//! Two pieces:
//!
//! - [`RegParams`] tracks numbered comparisons inside one `*_reg` test and
//!   reports every failure at [`RegParams::cleanup`] instead of stopping at
//!   the first one
//! - [`pages`] draws synthetic catalog pages (ruled grids, boxed rows,
//!   photo blocks) so detectors can be tested without fixture files
//!
//! # Usage
//!
//! ```ignore
//! use catseg_test::{RegParams, pages};
//!
//! let mut rp = RegParams::new("table");
//! let page = pages::ruled_grid(3, 4, &pages::GridLayout::default());
//! rp.compare_values(12.0, cells.len() as f64, 0.0);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: "display" additionally writes intermediate images to
//!   `tests/regout` for visual inspection

mod error;
pub mod pages;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // catseg-test is at crates/catseg-test
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}
