//! Edge detection
//!
//! [`canny`] follows the classic pipeline: Sobel gradients, non-maximum
//! suppression along the quantized gradient direction, then a double
//! threshold whose weak edges survive only when connected to a strong one.

use crate::convolve::convolve_plane;
use crate::kernel::Kernel;
use crate::{FilterError, FilterResult, to_gray};
use catseg_core::{Pix, PixelDepth};

/// Per-pixel Sobel responses
#[derive(Debug, Clone)]
pub struct Gradients {
    /// Image width
    pub width: u32,
    /// Image height
    pub height: u32,
    /// d/dx, row-major
    pub gx: Vec<f32>,
    /// d/dy, row-major
    pub gy: Vec<f32>,
}

impl Gradients {
    /// L1 gradient magnitude `|gx| + |gy|` at (x, y)
    #[inline]
    pub fn magnitude(&self, x: u32, y: u32) -> f32 {
        let i = (y * self.width + x) as usize;
        self.gx[i].abs() + self.gy[i].abs()
    }
}

/// Compute 3x3 Sobel gradients of a gray or color image.
pub fn sobel_gradients(pix: &Pix) -> FilterResult<Gradients> {
    let gray = to_gray(pix)?;
    let w = gray.width() as usize;
    let h = gray.height() as usize;
    let src: Vec<f32> = gray.data().iter().map(|&v| v as f32).collect();

    Ok(Gradients {
        width: gray.width(),
        height: gray.height(),
        gx: convolve_plane(&src, w, h, &Kernel::sobel_x()),
        gy: convolve_plane(&src, w, h, &Kernel::sobel_y()),
    })
}

/// Canny edge detector
///
/// Returns a binary image with edge pixels set to 1. Magnitudes use the
/// L1 norm. Pixels at or above `high` seed edges; pixels above `low`
/// extend them.
pub fn canny(pix: &Pix, low: f32, high: f32) -> FilterResult<Pix> {
    if low < 0.0 || low > high {
        return Err(FilterError::InvalidParameters(format!(
            "canny thresholds must satisfy 0 <= low <= high: low={}, high={}",
            low, high
        )));
    }

    let grad = sobel_gradients(pix)?;
    let w = grad.width as usize;
    let h = grad.height as usize;
    let mag: Vec<f32> = grad
        .gx
        .iter()
        .zip(&grad.gy)
        .map(|(x, y)| x.abs() + y.abs())
        .collect();

    // non-maximum suppression; the one-pixel frame never holds an edge
    let mut thin = vec![0.0f32; w * h];
    for y in 1..h.saturating_sub(1) {
        for x in 1..w.saturating_sub(1) {
            let i = y * w + x;
            let m = mag[i];
            if m <= low {
                continue;
            }
            let (dx, dy) = (grad.gx[i], grad.gy[i]);
            let (a, b) = neighbors_along(dx, dy, i, w);
            if m > mag[a] && m >= mag[b] {
                thin[i] = m;
            }
        }
    }

    // hysteresis
    let mut out = vec![0u8; w * h];
    let mut stack = Vec::new();
    for i in 0..w * h {
        if thin[i] >= high && out[i] == 0 {
            out[i] = 1;
            stack.push(i);
            while let Some(j) = stack.pop() {
                let (jx, jy) = ((j % w) as i64, (j / w) as i64);
                for ny in jy - 1..=jy + 1 {
                    for nx in jx - 1..=jx + 1 {
                        if nx < 0 || ny < 0 || nx >= w as i64 || ny >= h as i64 {
                            continue;
                        }
                        let k = ny as usize * w + nx as usize;
                        if out[k] == 0 && thin[k] > low {
                            out[k] = 1;
                            stack.push(k);
                        }
                    }
                }
            }
        }
    }

    Ok(Pix::from_raw(grad.width, grad.height, PixelDepth::Bit1, out)?)
}

/// Indices of the two neighbors along the gradient direction,
/// quantized to 0, 45, 90, or 135 degrees.
fn neighbors_along(dx: f32, dy: f32, i: usize, w: usize) -> (usize, usize) {
    // tan(22.5) and tan(67.5)
    const T1: f32 = 0.414_213_56;
    const T2: f32 = 2.414_213_6;
    let ax = dx.abs();
    let ay = dy.abs();
    if ay <= ax * T1 {
        (i - 1, i + 1)
    } else if ay >= ax * T2 {
        (i - w, i + w)
    } else if (dx > 0.0) == (dy > 0.0) {
        (i - w - 1, i + w + 1)
    } else {
        (i - w + 1, i + w - 1)
    }
}
