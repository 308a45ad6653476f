//! Convolution kernels

use crate::{FilterError, FilterResult};

/// A 2D convolution kernel with its origin at the center
#[derive(Debug, Clone, PartialEq)]
pub struct Kernel {
    width: u32,
    height: u32,
    /// Row-major values
    data: Vec<f32>,
}

impl Kernel {
    /// Create a kernel from row-major values.
    ///
    /// Both dimensions must be odd so the kernel has a center.
    pub fn from_slice(width: u32, height: u32, data: &[f32]) -> FilterResult<Self> {
        if width == 0 || height == 0 || width % 2 == 0 || height % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "kernel dimensions must be odd and positive: {}x{}",
                width, height
            )));
        }
        if data.len() != (width * height) as usize {
            return Err(FilterError::InvalidKernel(format!(
                "expected {} values, got {}",
                width * height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: data.to_vec(),
        })
    }

    /// Create a horizontal 1D Gaussian kernel (`size` x 1), normalized.
    ///
    /// A non-positive `sigma` is derived from the size as
    /// `0.3 * ((size - 1) * 0.5 - 1) + 0.8`.
    pub fn gaussian_1d(size: u32, sigma: f32) -> FilterResult<Self> {
        if size == 0 || size % 2 == 0 {
            return Err(FilterError::InvalidKernel(format!(
                "gaussian size must be odd: {}",
                size
            )));
        }
        let sigma = if sigma > 0.0 {
            sigma
        } else {
            0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8
        };
        let half = (size / 2) as i32;
        let data: Vec<f32> = (-half..=half)
            .map(|i| (-((i * i) as f32) / (2.0 * sigma * sigma)).exp())
            .collect();
        let mut kernel = Self {
            width: size,
            height: 1,
            data,
        };
        kernel.normalize();
        Ok(kernel)
    }

    /// Sobel kernel responding to horizontal intensity change (d/dx).
    pub fn sobel_x() -> Self {
        Self {
            width: 3,
            height: 3,
            data: vec![-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0],
        }
    }

    /// Sobel kernel responding to vertical intensity change (d/dy).
    pub fn sobel_y() -> Self {
        Self {
            width: 3,
            height: 3,
            data: vec![-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0],
        }
    }

    /// Swap rows and columns.
    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for x in 0..self.width {
            for y in 0..self.height {
                data.push(self.data[(y * self.width + x) as usize]);
            }
        }
        Self {
            width: self.height,
            height: self.width,
            data,
        }
    }

    /// Get the kernel width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the kernel height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the kernel data.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Get a value at (x, y).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Normalize the kernel so that values sum to 1.
    ///
    /// Kernels summing to zero are left untouched.
    pub fn normalize(&mut self) {
        let sum = self.sum();
        if sum.abs() > f32::EPSILON {
            for v in &mut self.data {
                *v /= sum;
            }
        }
    }

    /// Get the sum of all kernel values.
    pub fn sum(&self) -> f32 {
        self.data.iter().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gaussian_is_normalized_and_symmetric() {
        let k = Kernel::gaussian_1d(5, 0.0).unwrap();
        assert!((k.sum() - 1.0).abs() < 1e-5);
        assert_eq!(k.get(0, 0), k.get(4, 0));
        assert!(k.get(2, 0).unwrap() > k.get(1, 0).unwrap());
        assert!(Kernel::gaussian_1d(4, 1.0).is_err());
    }

    #[test]
    fn test_transpose() {
        let k = Kernel::gaussian_1d(3, 1.0).unwrap().transpose();
        assert_eq!((k.width(), k.height()), (1, 3));
        assert_eq!(Kernel::sobel_x().transpose(), Kernel::sobel_y());
    }
}
