//! Rectangle rendering
//!
//! Used to paint synthetic pages and to render debug overlays.

use super::PixMut;
use crate::block::Block;

impl PixMut {
    /// Fill the part of `block` that lies inside the image with `val`.
    pub fn fill_block(&mut self, block: &Block, val: u32) {
        let Some(b) = block.clip(self.width() as i32, self.height() as i32) else {
            return;
        };
        for y in b.y..b.bottom() {
            for x in b.x..b.right() {
                self.set_pixel_unchecked(x as u32, y as u32, val);
            }
        }
    }

    /// Draw the outline of `block` with the given line width.
    ///
    /// The outline is drawn inside the block boundary.
    pub fn draw_block_outline(&mut self, block: &Block, line_width: i32, val: u32) {
        let lw = line_width.max(1).min(block.w).min(block.h);
        if lw <= 0 {
            return;
        }
        let top = Block::new_unchecked(block.x, block.y, block.w, lw);
        let bottom = Block::new_unchecked(block.x, block.bottom() - lw, block.w, lw);
        let left = Block::new_unchecked(block.x, block.y, lw, block.h);
        let right = Block::new_unchecked(block.right() - lw, block.y, lw, block.h);
        for edge in [top, bottom, left, right] {
            self.fill_block(&edge, val);
        }
    }
}
