//! Depth conversion

use super::{Pix, PixelDepth, color};
use crate::error::Result;

impl Pix {
    /// Convert to 8-bpp grayscale.
    ///
    /// - 8 bpp: returns a shared clone
    /// - 32 bpp: luminance (0.299 R + 0.587 G + 0.114 B)
    /// - 1 bpp: foreground becomes black (0), background white (255)
    pub fn convert_to_8(&self) -> Result<Pix> {
        match self.depth() {
            PixelDepth::Bit8 => Ok(self.clone()),
            PixelDepth::Bit32 => {
                let data = self
                    .data()
                    .chunks_exact(4)
                    .map(|p| color::luminance(p[0], p[1], p[2]))
                    .collect();
                Pix::from_raw(self.width(), self.height(), PixelDepth::Bit8, data)
            }
            PixelDepth::Bit1 => {
                let data = self
                    .data()
                    .iter()
                    .map(|&v| if v != 0 { 0 } else { 255 })
                    .collect();
                Pix::from_raw(self.width(), self.height(), PixelDepth::Bit8, data)
            }
        }
    }

    /// Convert to 32-bpp RGBA.
    ///
    /// Gray values are replicated on the three color channels; binary
    /// images map foreground to black.
    pub fn convert_to_32(&self) -> Result<Pix> {
        if self.depth() == PixelDepth::Bit32 {
            return Ok(self.clone());
        }
        let gray = self.convert_to_8()?;
        let mut data = Vec::with_capacity(gray.data().len() * 4);
        for &g in gray.data() {
            data.extend_from_slice(&color::to_bytes(color::compose_rgb(g, g, g)));
        }
        Pix::from_raw(self.width(), self.height(), PixelDepth::Bit32, data)
    }
}
