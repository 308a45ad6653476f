//! Row/column grid reconstruction
//!
//! Blocks are visited in `(y, x)` order. Each block joins the first row
//! whose anchor (the row's first member) lies within `row_threshold`
//! pixels vertically; otherwise it opens a new row. Rows are then sorted
//! by x, which yields the column index.
//!
//! A block far taller than the threshold can end up alone in its own row.
//! That is expected: the threshold is a local proximity rule, not a lane.

use catseg_core::block::{sort_by_x, sort_reading_order};
use catseg_core::{Block, GridCell};
use tracing::debug;

/// Default vertical tolerance between a block and a row anchor, in pixels
pub const DEFAULT_ROW_THRESHOLD: i32 = 20;

/// Clusters blocks into a row/column grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBuilder {
    row_threshold: i32,
}

impl Default for GridBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_ROW_THRESHOLD)
    }
}

impl GridBuilder {
    /// Create a builder; negative thresholds are treated as 0.
    pub fn new(row_threshold: i32) -> Self {
        Self {
            row_threshold: row_threshold.max(0),
        }
    }

    /// Vertical tolerance in pixels
    pub fn row_threshold(&self) -> i32 {
        self.row_threshold
    }

    /// Cluster `blocks` into rows, each sorted by x.
    ///
    /// Rows come out in order of first appearance, which is top to bottom.
    pub fn rows(&self, blocks: &[Block]) -> Vec<Vec<Block>> {
        let mut sorted = blocks.to_vec();
        sort_reading_order(&mut sorted);

        let mut rows: Vec<Vec<Block>> = Vec::new();
        for block in sorted {
            let slot = rows
                .iter_mut()
                .find(|row| (block.y - row[0].y).abs() <= self.row_threshold);
            match slot {
                Some(row) => row.push(block),
                None => rows.push(vec![block]),
            }
        }

        for row in &mut rows {
            sort_by_x(row);
        }
        rows
    }

    /// Assign `row`/`col` indices to `blocks`.
    ///
    /// The result is ordered row by row, left to right. Empty input gives
    /// an empty grid.
    pub fn build(&self, blocks: &[Block]) -> Vec<GridCell> {
        let rows = self.rows(blocks);
        let cells: Vec<GridCell> = rows
            .iter()
            .enumerate()
            .flat_map(|(r, row)| {
                row.iter()
                    .enumerate()
                    .map(move |(c, block)| GridCell::new(*block, r, c))
            })
            .collect();
        debug!(
            blocks = blocks.len(),
            rows = rows.len(),
            threshold = self.row_threshold,
            "grid built"
        );
        cells
    }

    /// Rebuild a grid from previously built cells.
    pub fn rebuild(&self, cells: &[GridCell]) -> Vec<GridCell> {
        let blocks: Vec<Block> = cells.iter().map(|c| c.block).collect();
        self.build(&blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(x: i32, y: i32) -> Block {
        Block::new_unchecked(x, y, 30, 30)
    }

    #[test]
    fn test_empty() {
        assert!(GridBuilder::default().build(&[]).is_empty());
    }

    #[test]
    fn test_jittered_rows() {
        let blocks = [b(200, 105), b(10, 98), b(100, 100), b(50, 0), b(0, 12)];
        let cells = GridBuilder::default().build(&blocks);
        let idx: Vec<(usize, usize, i32)> =
            cells.iter().map(|c| (c.row, c.col, c.block.x)).collect();
        assert_eq!(
            idx,
            vec![(0, 0, 0), (0, 1, 50), (1, 0, 10), (1, 1, 100), (1, 2, 200)]
        );
    }

    #[test]
    fn test_anchor_is_first_member() {
        // 0 -> 15 -> 30 chains, but 30 is measured against the anchor at 0
        let cells = GridBuilder::default().build(&[b(0, 0), b(40, 15), b(80, 30)]);
        let rows: Vec<usize> = cells.iter().map(|c| c.row).collect();
        assert_eq!(rows, vec![0, 0, 1]);
    }

    #[test]
    fn test_tall_block_opens_own_row() {
        let tall = Block::new_unchecked(0, 60, 40, 200);
        let cells = GridBuilder::new(20).build(&[b(0, 0), tall, b(50, 5)]);
        assert_eq!(cells.last().map(|c| (c.row, c.block)), Some((1, tall)));
    }
}
