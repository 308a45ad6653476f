//! Block and GridCell - Rectangle regions
//!
//! A [`Block`] is an axis-aligned rectangle in page-pixel coordinates.
//! It is the common currency of every detector: table cells, photo
//! regions, and generic content blobs are all blocks. A [`GridCell`] is a
//! block that the grid builder has placed at a row and column.

mod sort;

pub use sort::{sort_by_x, sort_reading_order};

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Semantic type of a block, when a detector can tell.
///
/// Only the layout-model strategy assigns kinds; geometric detectors
/// leave [`Block::kind`] empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    /// A whole table region
    Table,
    /// A cell obtained by decomposing a table into rows and columns
    TableCell,
    /// Running text
    Text,
    /// A title or heading
    Title,
    /// A figure or photograph
    Figure,
}

impl BlockKind {
    /// Parse a layout label, case-insensitively.
    ///
    /// Accepts the usual document-layout vocabulary (`table`, `text`,
    /// `paragraph`, `title`, `header`, `figure`, `image`, `picture`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "table" => Some(Self::Table),
            "table_cell" | "cell" => Some(Self::TableCell),
            "text" | "paragraph" | "list" | "plain text" => Some(Self::Text),
            "title" | "header" | "heading" | "doc_title" | "paragraph_title" => Some(Self::Title),
            "figure" | "image" | "picture" | "photo" => Some(Self::Figure),
            _ => None,
        }
    }
}

/// A rectangle region
///
/// This is a small `Copy` type: detectors produce them by the hundred and
/// pass them around by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Block {
    /// Left x coordinate
    pub x: i32,
    /// Top y coordinate
    pub y: i32,
    /// Width
    pub w: i32,
    /// Height
    pub h: i32,
    /// Semantic type, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<BlockKind>,
}

impl Block {
    /// Create a new block
    ///
    /// # Errors
    ///
    /// Returns an error if width or height is negative.
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Result<Self> {
        if w < 0 || h < 0 {
            return Err(Error::InvalidParameter(format!(
                "block dimensions must be non-negative: w={}, h={}",
                w, h
            )));
        }
        Ok(Self::new_unchecked(x, y, w, h))
    }

    /// Create a block without validation
    pub const fn new_unchecked(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self {
            x,
            y,
            w,
            h,
            kind: None,
        }
    }

    /// Return a copy tagged with `kind`.
    pub fn with_kind(mut self, kind: BlockKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// Get the right x coordinate (exclusive)
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    /// Get the bottom y coordinate (exclusive)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Exact vertical center
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y as f64 + self.h as f64 / 2.0
    }

    /// Get the area
    #[inline]
    pub fn area(&self) -> i64 {
        self.w as i64 * self.h as i64
    }

    /// Width over height; `None` for zero-height blocks.
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.h > 0).then(|| self.w as f64 / self.h as f64)
    }

    /// Check if the block is empty (zero area)
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Check if this block overlaps another
    pub fn overlaps(&self, other: &Block) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Compute the intersection of two blocks
    ///
    /// The result keeps the kind of `self`.
    pub fn intersect(&self, other: &Block) -> Option<Block> {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        (x < right && y < bottom).then(|| Block {
            kind: self.kind,
            ..Block::new_unchecked(x, y, right - x, bottom - y)
        })
    }

    /// Compute the bounding block of two blocks
    pub fn union(&self, other: &Block) -> Block {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Block::new_unchecked(x, y, right - x, bottom - y)
    }

    /// Translate the block by (dx, dy)
    pub fn translate(&self, dx: i32, dy: i32) -> Block {
        Block {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// Expand the block by a margin on all sides
    pub fn expand(&self, margin: i32) -> Block {
        Block {
            x: self.x - margin,
            y: self.y - margin,
            w: self.w + 2 * margin,
            h: self.h + 2 * margin,
            kind: self.kind,
        }
    }

    /// Clip the block to fit within `[0, width) x [0, height)`
    pub fn clip(&self, width: i32, height: i32) -> Option<Block> {
        self.intersect(&Block::new_unchecked(0, 0, width, height))
    }
}

/// A block placed on the page grid
///
/// Invariant (maintained by the grid builder): `row` is non-decreasing in
/// vertical position, and `col` increases with horizontal position inside
/// a row. Indices are local to one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridCell {
    /// Cell geometry
    #[serde(flatten)]
    pub block: Block,
    /// Row index, 0-based
    pub row: usize,
    /// Column index within the row, 0-based
    pub col: usize,
}

impl GridCell {
    /// Create a grid cell
    pub fn new(block: Block, row: usize, col: usize) -> Self {
        Self { block, row, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clip_and_expand() {
        let b = Block::new_unchecked(0, 0, 20, 20).expand(4);
        assert_eq!(b, Block::new_unchecked(-4, -4, 28, 28));
        assert_eq!(b.clip(500, 500), Some(Block::new_unchecked(0, 0, 24, 24)));
        assert_eq!(Block::new_unchecked(600, 0, 5, 5).clip(500, 500), None);
    }

    #[test]
    fn test_new_rejects_negative() {
        assert!(Block::new(0, 0, -1, 3).is_err());
        assert!(Block::new(0, 0, 0, 3).is_ok());
    }

    #[test]
    fn test_kind_labels() {
        assert_eq!(BlockKind::from_label("Table"), Some(BlockKind::Table));
        assert_eq!(BlockKind::from_label(" figure "), Some(BlockKind::Figure));
        assert_eq!(BlockKind::from_label("formula"), None);
    }
}
