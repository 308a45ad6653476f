//! catseg-io - Image I/O for catalog page segmentation
//!
//! Pages arrive as PNG or JPEG files; crops leave as PNG.
//!
//! - [`read_image`] detects the format from the file header and decodes
//! - [`write_png`] / [`write_image`] encode a [`Pix`]
//! - [`detect_format`] inspects magic numbers without decoding

mod error;
pub mod format;
pub mod jpeg;
pub mod png;

pub use catseg_core::ImageFormat;
pub use error::{IoError, IoResult};
pub use format::{detect_format, detect_format_from_bytes, is_page_image_path};

use catseg_core::Pix;
use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

/// Read an image from a file path.
///
/// # Errors
///
/// Returns [`IoError::Io`] when the file cannot be opened,
/// [`IoError::UnsupportedFormat`] for anything but PNG/JPEG, and
/// [`IoError::DecodeError`] for corrupt data.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Pix> {
    let bytes = std::fs::read(path.as_ref())?;
    read_image_mem(&bytes)
}

/// Decode an image held in memory.
pub fn read_image_mem(data: &[u8]) -> IoResult<Pix> {
    match detect_format_from_bytes(data)? {
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        ImageFormat::Jpeg => jpeg::read_jpeg(Cursor::new(data)),
        ImageFormat::Unknown => Err(IoError::UnsupportedFormat(
            "unrecognized image header".to_string(),
        )),
    }
}

/// Write an image in the given format.
///
/// Only PNG output is supported; page crops are always written lossless.
pub fn write_image<P: AsRef<Path>>(pix: &Pix, path: P, format: ImageFormat) -> IoResult<()> {
    match format {
        ImageFormat::Png => write_png(pix, path),
        other => Err(IoError::UnsupportedFormat(format!(
            "writing {:?} is not supported",
            other
        ))),
    }
}

/// Write an image as PNG to a file path.
pub fn write_png<P: AsRef<Path>>(pix: &Pix, path: P) -> IoResult<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    png::write_png(pix, &mut writer)?;
    writer.flush()?;
    Ok(())
}
