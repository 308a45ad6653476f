//! PIX - The main image container
//!
//! The `Pix` structure is the raster type shared by every stage of the
//! segmentation pipeline. It supports the three depths the pipeline needs:
//! binary masks, 8-bit grayscale, and 32-bit RGBA.
//!
//! # Pixel layout
//!
//! - 1-bpp and 8-bpp images store one byte per pixel (binary values are 0/1)
//! - 32-bpp images store four bytes per pixel in R, G, B, A order
//! - Rows are contiguous, with no padding
//!
//! # Ownership model
//!
//! `Pix` uses `Arc` for cheap cloning (shared ownership), which lets the
//! same decoded page be handed to several detector threads at once.
//! To modify pixel data, convert to `PixMut` via [`Pix::try_into_mut`]
//! or [`Pix::to_mut`], then convert back with `Into<Pix>`.

mod access;
mod clip;
pub mod color;
mod convert;
mod graphics;
mod ops;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Pixel depth (bits per pixel)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PixelDepth {
    /// 1-bit binary image (foreground = 1)
    Bit1 = 1,
    /// 8-bit grayscale
    Bit8 = 8,
    /// 32-bit RGBA
    Bit32 = 32,
}

impl PixelDepth {
    /// Get the number of bits per pixel.
    pub fn bits(self) -> u32 {
        self as u32
    }

    /// Number of storage bytes per pixel.
    #[inline]
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            PixelDepth::Bit32 => 4,
            _ => 1,
        }
    }
}

/// Image file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageFormat {
    /// Unknown format
    #[default]
    Unknown,
    /// PNG format
    Png,
    /// JFIF JPEG format
    Jpeg,
}

/// Internal PIX data
#[derive(Debug, Clone)]
struct PixData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// Depth in bits per pixel
    depth: PixelDepth,
    /// Input file format
    informat: ImageFormat,
    /// Row-major pixel bytes
    data: Vec<u8>,
}

/// PIX - Main image container
///
/// # Examples
///
/// ```
/// use catseg_core::{Pix, PixelDepth};
///
/// let pix = Pix::new(64, 32, PixelDepth::Bit1).unwrap();
/// assert_eq!(pix.count_pixels(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Pix {
    inner: Arc<PixData>,
}

impl Pix {
    /// Create a new PIX with the specified dimensions and depth.
    ///
    /// The image data is initialized to zero (black for gray/RGB,
    /// background for binary).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if width or height is 0.
    pub fn new(width: u32, height: u32, depth: PixelDepth) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let size = width as usize * height as usize * depth.bytes_per_pixel();
        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                depth,
                informat: ImageFormat::Unknown,
                data: vec![0u8; size],
            }),
        })
    }

    /// Create a PIX with every sample set to `value`.
    ///
    /// For 32-bpp images the value is a composed RGBA pixel
    /// (see [`color::compose_rgba`]).
    pub fn new_filled(width: u32, height: u32, depth: PixelDepth, value: u32) -> Result<Self> {
        let pix = Self::new(width, height, depth)?;
        let mut pm = pix.try_into_mut().unwrap_or_else(|p| p.to_mut());
        pm.fill(value);
        Ok(pm.into())
    }

    /// Wrap raw row-major bytes in a PIX.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DataLength`] if `data` does not hold exactly
    /// `width * height * bytes_per_pixel` bytes.
    pub fn from_raw(width: u32, height: u32, depth: PixelDepth, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimension { width, height });
        }
        let expected = width as usize * height as usize * depth.bytes_per_pixel();
        if data.len() != expected {
            return Err(Error::DataLength {
                expected,
                actual: data.len(),
            });
        }
        Ok(Pix {
            inner: Arc::new(PixData {
                width,
                height,
                depth,
                informat: ImageFormat::Unknown,
                data,
            }),
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get the input file format.
    #[inline]
    pub fn informat(&self) -> ImageFormat {
        self.inner.informat
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get the bytes of row `y`.
    ///
    /// # Panics
    ///
    /// Panics if `y >= height`.
    #[inline]
    pub fn row_data(&self, y: u32) -> &[u8] {
        let stride = self.stride();
        let start = y as usize * stride;
        &self.inner.data[start..start + stride]
    }

    /// Bytes per row.
    #[inline]
    pub fn stride(&self) -> usize {
        self.inner.width as usize * self.inner.depth.bytes_per_pixel()
    }

    /// Get the number of strong references to this PIX.
    #[inline]
    pub fn ref_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }

    /// Check if two PIX have the same width, height, and depth.
    pub fn sizes_equal(&self, other: &Pix) -> bool {
        self.inner.width == other.inner.width
            && self.inner.height == other.inner.height
            && self.inner.depth == other.inner.depth
    }

    /// Try to get unique ownership for mutation.
    ///
    /// Succeeds only when this is the last reference; otherwise the
    /// original `Pix` is handed back unchanged.
    pub fn try_into_mut(self) -> std::result::Result<PixMut, Self> {
        match Arc::try_unwrap(self.inner) {
            Ok(inner) => Ok(PixMut { inner }),
            Err(inner) => Err(Pix { inner }),
        }
    }

    /// Get a mutable deep copy of this PIX.
    pub fn to_mut(&self) -> PixMut {
        PixMut {
            inner: (*self.inner).clone(),
        }
    }
}

/// Mutable PIX
///
/// Holds exclusive ownership of the pixel buffer. Convert back to a
/// shareable [`Pix`] with `Into<Pix>`.
#[derive(Debug)]
pub struct PixMut {
    inner: PixData,
}

impl PixMut {
    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Get the pixel depth.
    #[inline]
    pub fn depth(&self) -> PixelDepth {
        self.inner.depth
    }

    /// Get raw access to the image data.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get mutable access to the image data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Record the format the image was decoded from.
    pub fn set_informat(&mut self, format: ImageFormat) {
        self.inner.informat = format;
    }

    /// Set every pixel to `value`.
    pub fn fill(&mut self, value: u32) {
        match self.inner.depth {
            PixelDepth::Bit1 => self.inner.data.fill((value != 0) as u8),
            PixelDepth::Bit8 => self.inner.data.fill(value.min(255) as u8),
            PixelDepth::Bit32 => {
                let bytes = color::to_bytes(value);
                for chunk in self.inner.data.chunks_exact_mut(4) {
                    chunk.copy_from_slice(&bytes);
                }
            }
        }
    }
}

impl From<PixMut> for Pix {
    fn from(pm: PixMut) -> Self {
        Pix {
            inner: Arc::new(pm.inner),
        }
    }
}
