//! Pixelwise logical operations and pixel counting

use super::{Pix, PixelDepth};
use crate::block::Block;
use crate::error::{Error, Result};

impl Pix {
    fn check_same_binary(&self, other: &Pix) -> Result<()> {
        if self.depth() != PixelDepth::Bit1 || other.depth() != PixelDepth::Bit1 {
            return Err(Error::UnsupportedDepth(if self.depth() != PixelDepth::Bit1 {
                self.depth().bits()
            } else {
                other.depth().bits()
            }));
        }
        if !self.sizes_equal(other) {
            return Err(Error::IncompatibleSizes(
                self.width(),
                self.height(),
                other.width(),
                other.height(),
            ));
        }
        Ok(())
    }

    /// Union of two binary images.
    pub fn or(&self, other: &Pix) -> Result<Pix> {
        self.check_same_binary(other)?;
        let data = self
            .data()
            .iter()
            .zip(other.data())
            .map(|(&a, &b)| a | b)
            .collect();
        Pix::from_raw(self.width(), self.height(), PixelDepth::Bit1, data)
    }

    /// Intersection of two binary images.
    pub fn and(&self, other: &Pix) -> Result<Pix> {
        self.check_same_binary(other)?;
        let data = self
            .data()
            .iter()
            .zip(other.data())
            .map(|(&a, &b)| a & b)
            .collect();
        Pix::from_raw(self.width(), self.height(), PixelDepth::Bit1, data)
    }

    /// Photometric inversion.
    ///
    /// Binary images swap foreground and background; gray images map
    /// `v` to `255 - v`.
    pub fn invert(&self) -> Result<Pix> {
        let data = match self.depth() {
            PixelDepth::Bit1 => self.data().iter().map(|&v| v ^ 1).collect(),
            PixelDepth::Bit8 => self.data().iter().map(|&v| 255 - v).collect(),
            PixelDepth::Bit32 => return Err(Error::UnsupportedDepth(32)),
        };
        Pix::from_raw(self.width(), self.height(), self.depth(), data)
    }

    /// Count foreground pixels in a binary image.
    ///
    /// For other depths, counts non-zero samples.
    pub fn count_pixels(&self) -> u64 {
        match self.depth() {
            PixelDepth::Bit32 => self
                .data()
                .chunks_exact(4)
                .filter(|p| p.iter().any(|&b| b != 0))
                .count() as u64,
            _ => self.data().iter().filter(|&&v| v != 0).count() as u64,
        }
    }

    /// Count non-zero pixels inside `block` (clipped to the image).
    pub fn count_pixels_in_block(&self, block: &Block) -> u64 {
        let Some(b) = block.clip(self.width() as i32, self.height() as i32) else {
            return 0;
        };
        let mut count = 0u64;
        for y in b.y..b.bottom() {
            for x in b.x..b.right() {
                if self.get_pixel_unchecked(x as u32, y as u32) != 0 {
                    count += 1;
                }
            }
        }
        count
    }
}
