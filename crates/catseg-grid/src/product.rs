//! Product rows for pages without a table
//!
//! Blocks are walked top to bottom. A block joins the open row when its
//! top edge is within `threshold` pixels of the previous block's top edge;
//! otherwise the open row is closed for good and a new one starts.

use catseg_core::Block;
use serde::{Deserialize, Serialize};

/// Default vertical gap that closes a product row, in pixels
pub const DEFAULT_PRODUCT_THRESHOLD: i32 = 40;

/// A group of blocks believed to describe one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRow {
    /// Member blocks, in y order
    pub blocks: Vec<Block>,
    /// Vertical center of the members' combined span
    pub representative_y: f64,
}

impl ProductRow {
    /// Create a row and compute its representative y.
    ///
    /// An empty row has a representative y of 0.
    pub fn new(blocks: Vec<Block>) -> Self {
        let representative_y = match Self::span(&blocks) {
            Some(span) => span.center_y(),
            None => 0.0,
        };
        Self {
            blocks,
            representative_y,
        }
    }

    /// Bounding box of all members
    pub fn bounds(&self) -> Option<Block> {
        Self::span(&self.blocks)
    }

    fn span(blocks: &[Block]) -> Option<Block> {
        let (first, rest) = blocks.split_first()?;
        Some(rest.iter().fold(*first, |acc, b| acc.union(b)))
    }
}

/// Groups loose blocks into sequential product rows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductSegmenter {
    threshold: i32,
}

impl Default for ProductSegmenter {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCT_THRESHOLD)
    }
}

impl ProductSegmenter {
    /// Create a segmenter with the given row-closing gap
    pub fn new(threshold: i32) -> Self {
        Self {
            threshold: threshold.max(0),
        }
    }

    /// Row-closing gap in pixels
    pub fn threshold(&self) -> i32 {
        self.threshold
    }

    /// Group `blocks` into product rows.
    ///
    /// Input is stably sorted by y first; blocks sharing a y keep their
    /// relative order.
    pub fn segment(&self, blocks: &[Block]) -> Vec<ProductRow> {
        let mut sorted = blocks.to_vec();
        sorted.sort_by_key(|b| b.y);

        let mut rows = Vec::new();
        let mut open: Vec<Block> = Vec::new();
        for block in sorted {
            if let Some(prev) = open.last() {
                if (block.y - prev.y).abs() >= self.threshold {
                    rows.push(ProductRow::new(std::mem::take(&mut open)));
                }
            }
            open.push(block);
        }
        if !open.is_empty() {
            rows.push(ProductRow::new(open));
        }
        rows
    }
}
