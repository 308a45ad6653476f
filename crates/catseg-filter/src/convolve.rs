//! Convolution and blur
//!
//! Samples outside the image replicate the nearest edge pixel.

use crate::kernel::Kernel;
use crate::{FilterError, FilterResult, to_gray};
use catseg_core::{Pix, PixelDepth};

/// Convolve a single-channel float plane with `kernel`.
pub(crate) fn convolve_plane(src: &[f32], width: usize, height: usize, kernel: &Kernel) -> Vec<f32> {
    let kw = kernel.width() as i64;
    let kh = kernel.height() as i64;
    let (cx, cy) = (kw / 2, kh / 2);
    let k = kernel.data();
    let max_x = width as i64 - 1;
    let max_y = height as i64 - 1;

    let mut out = vec![0.0f32; width * height];
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let mut acc = 0.0f32;
            for j in 0..kh {
                let sy = (y + j - cy).clamp(0, max_y) as usize;
                let row = &src[sy * width..(sy + 1) * width];
                for i in 0..kw {
                    let sx = (x + i - cx).clamp(0, max_x) as usize;
                    acc += row[sx] * k[(j * kw + i) as usize];
                }
            }
            out[y as usize * width + x as usize] = acc;
        }
    }
    out
}

/// Separable convolution of an 8-bpp image
///
/// Applies `kernel_x` then `kernel_y`; the intermediate result is kept in
/// floating point and rounded once at the end.
pub fn convolve_sep(pix: &Pix, kernel_x: &Kernel, kernel_y: &Kernel) -> FilterResult<Pix> {
    if pix.depth() != PixelDepth::Bit8 {
        return Err(FilterError::UnsupportedDepth {
            expected: "8 bpp",
            actual: pix.depth().bits(),
        });
    }
    let w = pix.width() as usize;
    let h = pix.height() as usize;
    let src: Vec<f32> = pix.data().iter().map(|&v| v as f32).collect();

    let tmp = convolve_plane(&src, w, h, kernel_x);
    let out = convolve_plane(&tmp, w, h, kernel_y);

    let data = out
        .into_iter()
        .map(|v| v.round().clamp(0.0, 255.0) as u8)
        .collect();
    Ok(Pix::from_raw(pix.width(), pix.height(), PixelDepth::Bit8, data)?)
}

/// Gaussian blur with a square `size` x `size` window
///
/// Color input is converted to gray first. `sigma <= 0` derives sigma
/// from the window size.
pub fn gaussian_blur(pix: &Pix, size: u32, sigma: f32) -> FilterResult<Pix> {
    let gray = to_gray(pix)?;
    if size <= 1 {
        return Ok(gray);
    }
    let kx = Kernel::gaussian_1d(size, sigma)?;
    let ky = kx.transpose();
    convolve_sep(&gray, &kx, &ky)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blur_constant_is_identity() {
        let pix = Pix::new_filled(12, 9, PixelDepth::Bit8, 180).unwrap();
        let out = gaussian_blur(&pix, 5, 0.0).unwrap();
        assert!(out.data().iter().all(|&v| v == 180));
    }

    #[test]
    fn test_blur_spreads_a_dot() {
        let mut pm = Pix::new(9, 9, PixelDepth::Bit8).unwrap().to_mut();
        pm.set_pixel(4, 4, 255).unwrap();
        let out = gaussian_blur(&pm.into(), 5, 1.0).unwrap();
        let center = out.get_pixel(4, 4).unwrap();
        let near = out.get_pixel(5, 4).unwrap();
        assert!(center > near && near > 0);
        assert_eq!(out.get_pixel(0, 0), Some(0));
    }

    #[test]
    fn test_blur_rejects_binary() {
        let pix = Pix::new(4, 4, PixelDepth::Bit1).unwrap();
        assert!(gaussian_blur(&pix, 5, 0.0).is_err());
    }
}
