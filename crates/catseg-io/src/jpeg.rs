//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate. Grayscale input
//! becomes an 8-bpp image, everything else 32-bpp RGBA. JPEG writing is
//! not provided; crops are always written as PNG.

use crate::{IoError, IoResult};
use catseg_core::{ImageFormat, Pix, PixelDepth};
use jpeg_decoder::{Decoder, PixelFormat};
use std::io::Read;

/// Read a JPEG image from a reader.
///
/// # Arguments
/// * `reader` - A reader positioned at the JPEG SOI marker (`FF D8`)
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG header missing".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    let n = width as usize * height as usize;

    let (depth, data) = match info.pixel_format {
        PixelFormat::L8 => (PixelDepth::Bit8, pixels),
        PixelFormat::L16 => (
            PixelDepth::Bit8,
            pixels.chunks_exact(2).map(|p| p[0]).collect(),
        ),
        PixelFormat::RGB24 => {
            let mut out = Vec::with_capacity(n * 4);
            for px in pixels.chunks_exact(3) {
                out.extend_from_slice(&[px[0], px[1], px[2], 255]);
            }
            (PixelDepth::Bit32, out)
        }
        PixelFormat::CMYK32 => {
            let mut out = Vec::with_capacity(n * 4);
            for px in pixels.chunks_exact(4) {
                let k = 255 - px[3] as u32;
                let to_rgb = |c: u8| ((255 - c as u32) * k / 255) as u8;
                out.extend_from_slice(&[to_rgb(px[0]), to_rgb(px[1]), to_rgb(px[2]), 255]);
            }
            (PixelDepth::Bit32, out)
        }
    };

    let pix = Pix::from_raw(width, height, depth, data)?;
    let mut pm = pix.to_mut();
    pm.set_informat(ImageFormat::Jpeg);
    Ok(pm.into())
}
