//! PNG image format support
//!
//! Palette, low-bit-depth, and 16-bit images are normalized by the
//! decoder to 8-bit samples, so a page always arrives as 8-bpp gray or
//! 32-bpp RGBA.

use crate::{IoError, IoResult};
use catseg_core::{ImageFormat, Pix, PixelDepth};
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Pix> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let (width, height) = {
        let info = reader.info();
        (info.width, info.height)
    };
    let (color_type, bit_depth) = reader.output_color_type();
    if bit_depth != BitDepth::Eight {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported PNG output depth: {:?}",
            bit_depth
        )));
    }

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];
    let w = width as usize;

    let (depth, pixels) = match color_type {
        ColorType::Grayscale => {
            let mut out = Vec::with_capacity(w * height as usize);
            for row in data.chunks(bytes_per_row).take(height as usize) {
                out.extend_from_slice(&row[..w]);
            }
            (PixelDepth::Bit8, out)
        }
        ColorType::GrayscaleAlpha => {
            let mut out = Vec::with_capacity(w * height as usize * 4);
            for row in data.chunks(bytes_per_row).take(height as usize) {
                for px in row[..w * 2].chunks_exact(2) {
                    out.extend_from_slice(&[px[0], px[0], px[0], px[1]]);
                }
            }
            (PixelDepth::Bit32, out)
        }
        ColorType::Rgb => {
            let mut out = Vec::with_capacity(w * height as usize * 4);
            for row in data.chunks(bytes_per_row).take(height as usize) {
                for px in row[..w * 3].chunks_exact(3) {
                    out.extend_from_slice(&[px[0], px[1], px[2], 255]);
                }
            }
            (PixelDepth::Bit32, out)
        }
        ColorType::Rgba => {
            let mut out = Vec::with_capacity(w * height as usize * 4);
            for row in data.chunks(bytes_per_row).take(height as usize) {
                out.extend_from_slice(&row[..w * 4]);
            }
            (PixelDepth::Bit32, out)
        }
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "indexed PNG was not expanded".to_string(),
            ));
        }
    };

    let pix = Pix::from_raw(width, height, depth, pixels)?;
    let mut pm = pix.to_mut();
    pm.set_informat(ImageFormat::Png);
    Ok(pm.into())
}

/// Write a PNG image
///
/// Binary images are written as 8-bit gray with foreground in black.
pub fn write_png<W: Write>(pix: &Pix, writer: W) -> IoResult<()> {
    let width = pix.width();
    let height = pix.height();

    let (color_type, data) = match pix.depth() {
        PixelDepth::Bit1 => (ColorType::Grayscale, pix.convert_to_8()?.data().to_vec()),
        PixelDepth::Bit8 => (ColorType::Grayscale, pix.data().to_vec()),
        PixelDepth::Bit32 => (ColorType::Rgba, pix.data().to_vec()),
    };

    let mut encoder = Encoder::new(writer, width, height);
    encoder.set_color(color_type);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;

    writer
        .write_image_data(&data)
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;

    Ok(())
}
