//! Strategy selection
//!
//! Exactly one detector's cells are used per page, by strict priority:
//!
//! 1. table detector, when it found at least `min_table_cells`
//! 2. layout model, when enabled and non-empty
//! 3. fallback, even when empty
//!
//! There is no voting or confidence weighting between strategies.

use crate::{DetectionResult, Strategy};
use catseg_core::Block;
use tracing::debug;

/// Default minimum number of table cells for the `line-grid` strategy
pub const MIN_TABLE_CELLS: usize = 3;

/// The chosen strategy and its cells
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Winning strategy
    pub mode: Strategy,
    /// Its raw cells, in the detector's `(y, x)` order
    pub cells: Vec<Block>,
}

/// Pick one strategy's cells
///
/// `layout` is `None` when the layout model is disabled. An empty table
/// result never wins, whatever `min_table_cells` is.
pub fn select(
    table: DetectionResult,
    layout: Option<DetectionResult>,
    fallback: DetectionResult,
    min_table_cells: usize,
) -> Selection {
    let chosen = if !table.is_empty() && table.len() >= min_table_cells {
        table
    } else {
        match layout {
            Some(layout) if !layout.is_empty() => layout,
            _ => fallback,
        }
    };
    debug!(mode = %chosen.strategy, cells = chosen.len(), "strategy selected");
    Selection {
        mode: chosen.strategy,
        cells: chosen.blocks,
    }
}
