//! Structuring Element (SEL) for morphological operations
//!
//! A structuring element defines the neighborhood used in morphological
//! operations. The origin sits at `(width / 2, height / 2)` unless moved.

use crate::{MorphError, MorphResult};

/// Element type in a structuring element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum SelElement {
    /// Don't care - this position is ignored
    #[default]
    DontCare = 0,
    /// Hit - this position takes part in the operation
    Hit = 1,
}

/// Structuring Element (SEL)
#[derive(Debug, Clone, PartialEq)]
pub struct Sel {
    width: u32,
    height: u32,
    cx: u32,
    cy: u32,
    data: Vec<SelElement>,
}

impl Sel {
    /// Create a new empty (all don't-care) structuring element
    pub fn new(width: u32, height: u32) -> MorphResult<Self> {
        if width == 0 || height == 0 {
            return Err(MorphError::InvalidSel(format!(
                "sel dimensions must be positive: {}x{}",
                width, height
            )));
        }
        Ok(Self {
            width,
            height,
            cx: width / 2,
            cy: height / 2,
            data: vec![SelElement::DontCare; (width * height) as usize],
        })
    }

    /// Create a rectangular brick with every element a hit
    pub fn create_brick(width: u32, height: u32) -> MorphResult<Self> {
        let mut sel = Self::new(width, height)?;
        sel.data.fill(SelElement::Hit);
        Ok(sel)
    }

    /// Create a horizontal line (`length` x 1)
    pub fn create_horizontal(length: u32) -> MorphResult<Self> {
        Self::create_brick(length, 1)
    }

    /// Create a vertical line (1 x `length`)
    pub fn create_vertical(length: u32) -> MorphResult<Self> {
        Self::create_brick(1, length)
    }

    /// Get the SEL width
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Get the SEL height
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the origin x coordinate
    #[inline]
    pub fn origin_x(&self) -> u32 {
        self.cx
    }

    /// Get the origin y coordinate
    #[inline]
    pub fn origin_y(&self) -> u32 {
        self.cy
    }

    /// Move the origin
    pub fn set_origin(&mut self, cx: u32, cy: u32) -> MorphResult<()> {
        if cx >= self.width || cy >= self.height {
            return Err(MorphError::InvalidSel(format!(
                "origin ({}, {}) outside {}x{} sel",
                cx, cy, self.width, self.height
            )));
        }
        self.cx = cx;
        self.cy = cy;
        Ok(())
    }

    /// Get the element at (x, y)
    pub fn get_element(&self, x: u32, y: u32) -> Option<SelElement> {
        if x < self.width && y < self.height {
            Some(self.data[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Set the element at (x, y); out-of-range positions are ignored
    pub fn set_element(&mut self, x: u32, y: u32, elem: SelElement) {
        if x < self.width && y < self.height {
            self.data[(y * self.width + x) as usize] = elem;
        }
    }

    /// Number of hit elements
    pub fn hit_count(&self) -> usize {
        self.data.iter().filter(|&&e| e == SelElement::Hit).count()
    }

    /// True when every element is a hit
    pub fn is_brick(&self) -> bool {
        self.hit_count() == self.data.len()
    }

    /// Iterate over hit positions relative to origin
    pub fn hit_offsets(&self) -> impl Iterator<Item = (i32, i32)> + '_ {
        let cx = self.cx as i32;
        let cy = self.cy as i32;
        let width = self.width;

        self.data
            .iter()
            .enumerate()
            .filter_map(move |(idx, &elem)| {
                if elem == SelElement::Hit {
                    let x = (idx as u32 % width) as i32;
                    let y = (idx as u32 / width) as i32;
                    Some((x - cx, y - cy))
                } else {
                    None
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brick_offsets() {
        let sel = Sel::create_brick(3, 2).unwrap();
        assert_eq!((sel.origin_x(), sel.origin_y()), (1, 1));
        let offsets: Vec<_> = sel.hit_offsets().collect();
        assert_eq!(offsets.len(), 6);
        assert_eq!(offsets[0], (-1, -1));
        assert_eq!(offsets[5], (1, 0));
        assert!(sel.is_brick());
    }

    #[test]
    fn test_lines() {
        let h = Sel::create_horizontal(40).unwrap();
        assert_eq!((h.width(), h.height()), (40, 1));
        let v = Sel::create_vertical(40).unwrap();
        assert_eq!((v.width(), v.height()), (1, 40));
        assert!(Sel::create_horizontal(0).is_err());
    }

    #[test]
    fn test_sparse_sel() {
        let mut sel = Sel::new(3, 3).unwrap();
        sel.set_element(0, 1, SelElement::Hit);
        sel.set_element(2, 1, SelElement::Hit);
        assert!(!sel.is_brick());
        let offsets: Vec<_> = sel.hit_offsets().collect();
        assert_eq!(offsets, vec![(-1, 0), (1, 0)]);
        assert!(sel.set_origin(3, 0).is_err());
    }
}
