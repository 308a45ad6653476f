//! Rectangular clipping

use super::Pix;
use crate::block::Block;
use crate::error::{Error, Result};

impl Pix {
    /// Extract a rectangular region.
    ///
    /// The rectangle is clipped to the image bounds. The origin must lie
    /// inside the image and both dimensions must be non-zero.
    pub fn clip_rectangle(&self, x: u32, y: u32, w: u32, h: u32) -> Result<Pix> {
        if w == 0 || h == 0 {
            return Err(Error::InvalidParameter(format!(
                "clip rectangle has zero dimension: {}x{}",
                w, h
            )));
        }

        let src_w = self.width();
        let src_h = self.height();

        if x >= src_w || y >= src_h {
            return Err(Error::InvalidParameter(format!(
                "clip rectangle origin ({}, {}) is outside image bounds ({}x{})",
                x, y, src_w, src_h
            )));
        }

        let clip_w = w.min(src_w - x);
        let clip_h = h.min(src_h - y);
        let bpp = self.depth().bytes_per_pixel();

        let mut data = Vec::with_capacity(clip_w as usize * clip_h as usize * bpp);
        for row in y..y + clip_h {
            let line = self.row_data(row);
            let start = x as usize * bpp;
            data.extend_from_slice(&line[start..start + clip_w as usize * bpp]);
        }
        Pix::from_raw(clip_w, clip_h, self.depth(), data)
    }

    /// Extract the region covered by `block`, clipped to the image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] when the block does not
    /// intersect the image.
    pub fn clip_block(&self, block: &Block) -> Result<Pix> {
        let clipped = block
            .clip(self.width() as i32, self.height() as i32)
            .ok_or_else(|| {
                Error::InvalidParameter(format!(
                    "block {:?} does not intersect {}x{} image",
                    block,
                    self.width(),
                    self.height()
                ))
            })?;
        self.clip_rectangle(
            clipped.x as u32,
            clipped.y as u32,
            clipped.w as u32,
            clipped.h as u32,
        )
    }
}
