//! Pixel access
//!
//! Values are returned as `u32` regardless of depth: 0/1 for binary,
//! 0..=255 for gray, and a composed `0xRRGGBBAA` pixel for RGBA.

use super::{Pix, PixMut, PixelDepth, color};
use crate::error::{Error, Result};

#[inline]
fn read_at(data: &[u8], width: u32, depth: PixelDepth, x: u32, y: u32) -> u32 {
    let idx = (y as usize * width as usize + x as usize) * depth.bytes_per_pixel();
    match depth {
        PixelDepth::Bit32 => color::from_bytes(&data[idx..idx + 4]),
        _ => data[idx] as u32,
    }
}

impl Pix {
    /// Get a pixel value, or `None` outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking beyond slice indexing.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_at(self.data(), self.width(), self.depth(), x, y)
    }

    /// Get the RGB components of a pixel.
    ///
    /// Gray and binary images report their value on all three channels
    /// (binary foreground reads as black).
    pub fn get_rgb(&self, x: u32, y: u32) -> Option<(u8, u8, u8)> {
        let v = self.get_pixel(x, y)?;
        Some(match self.depth() {
            PixelDepth::Bit32 => color::extract_rgb(v),
            PixelDepth::Bit8 => (v as u8, v as u8, v as u8),
            PixelDepth::Bit1 => {
                let g = if v != 0 { 0 } else { 255 };
                (g, g, g)
            }
        })
    }
}

impl PixMut {
    /// Get a pixel value, or `None` outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<u32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_pixel_unchecked(x, y))
    }

    /// Get a pixel value without bounds checking beyond slice indexing.
    #[inline]
    pub fn get_pixel_unchecked(&self, x: u32, y: u32) -> u32 {
        read_at(self.data(), self.width(), self.depth(), x, y)
    }

    /// Set a pixel value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if `(x, y)` lies outside the image.
    pub fn set_pixel(&mut self, x: u32, y: u32, val: u32) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        self.set_pixel_unchecked(x, y, val);
        Ok(())
    }

    /// Set a pixel value; gray values saturate at 255, binary values at 1.
    #[inline]
    pub fn set_pixel_unchecked(&mut self, x: u32, y: u32, val: u32) {
        let depth = self.depth();
        let idx = (y as usize * self.width() as usize + x as usize) * depth.bytes_per_pixel();
        let data = self.data_mut();
        match depth {
            PixelDepth::Bit1 => data[idx] = (val != 0) as u8,
            PixelDepth::Bit8 => data[idx] = val.min(255) as u8,
            PixelDepth::Bit32 => data[idx..idx + 4].copy_from_slice(&color::to_bytes(val)),
        }
    }

    /// Set an opaque RGB pixel on a 32-bpp image.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDepth`] for non-RGBA images.
    pub fn set_rgb(&mut self, x: u32, y: u32, r: u8, g: u8, b: u8) -> Result<()> {
        if self.depth() != PixelDepth::Bit32 {
            return Err(Error::UnsupportedDepth(self.depth().bits()));
        }
        self.set_pixel(x, y, color::compose_rgb(r, g, b))
    }
}
