//! Adaptive thresholding

use crate::{FilterError, FilterResult, to_gray};
use catseg_core::{Pix, PixelDepth};

/// Adaptive mean threshold, inverted
///
/// Each pixel is compared with the mean of the `block_size` x `block_size`
/// window around it (the window is cut at the image border). The output
/// is a binary image whose foreground (1) marks pixels darker than the
/// local mean by more than `c`: `gray < mean - c`.
///
/// Uniform regions therefore stay background for any `c >= 0`.
///
/// # Errors
///
/// `block_size` must be odd and at least 3.
pub fn adaptive_threshold_mean(pix: &Pix, block_size: u32, c: f64) -> FilterResult<Pix> {
    if block_size < 3 || block_size % 2 == 0 {
        return Err(FilterError::InvalidParameters(format!(
            "block_size must be odd and >= 3, got {}",
            block_size
        )));
    }
    let gray = to_gray(pix)?;
    let w = gray.width() as usize;
    let h = gray.height() as usize;
    let src = gray.data();

    // integral image with a zero top row and left column
    let iw = w + 1;
    let mut integral = vec![0u64; iw * (h + 1)];
    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += src[y * w + x] as u64;
            integral[(y + 1) * iw + x + 1] = integral[y * iw + x + 1] + row_sum;
        }
    }

    let half = (block_size / 2) as usize;
    let mut out = vec![0u8; w * h];
    for y in 0..h {
        let y0 = y.saturating_sub(half);
        let y1 = (y + half + 1).min(h);
        for x in 0..w {
            let x0 = x.saturating_sub(half);
            let x1 = (x + half + 1).min(w);
            let sum = integral[y1 * iw + x1] + integral[y0 * iw + x0]
                - integral[y0 * iw + x1]
                - integral[y1 * iw + x0];
            let count = ((y1 - y0) * (x1 - x0)) as f64;
            let mean = sum as f64 / count;
            if (src[y * w + x] as f64) < mean - c {
                out[y * w + x] = 1;
            }
        }
    }

    Ok(Pix::from_raw(gray.width(), gray.height(), PixelDepth::Bit1, out)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catseg_core::Block;

    #[test]
    fn test_uniform_is_background() {
        for v in [0, 128, 255] {
            let pix = Pix::new_filled(20, 20, PixelDepth::Bit8, v).unwrap();
            let bin = adaptive_threshold_mean(&pix, 15, 2.0).unwrap();
            assert_eq!(bin.count_pixels(), 0);
        }
    }

    #[test]
    fn test_dark_line_is_foreground() {
        let mut pm = Pix::new_filled(40, 40, PixelDepth::Bit8, 255).unwrap().to_mut();
        pm.fill_block(&Block::new_unchecked(0, 20, 40, 2), 0);
        let bin = adaptive_threshold_mean(&pm.into(), 15, 2.0).unwrap();
        assert_eq!(bin.count_pixels(), 80);
        assert_eq!(bin.get_pixel(10, 20), Some(1));
        assert_eq!(bin.get_pixel(10, 10), Some(0));
    }

    #[test]
    fn test_even_block_rejected() {
        let pix = Pix::new(8, 8, PixelDepth::Bit8).unwrap();
        assert!(adaptive_threshold_mean(&pix, 14, 2.0).is_err());
    }
}
