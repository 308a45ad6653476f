//! Synthetic catalog pages
//!
//! All pages are 8-bpp white with black ink, which is what a scanned and
//! grayscale-converted catalog page looks like to the detectors.

use crate::error::{TestError, TestResult};
use catseg_core::{Block, Pix, PixelDepth};
use std::path::{Path, PathBuf};

/// White
pub const PAPER: u32 = 255;
/// Black
pub const INK: u32 = 0;

/// Geometry of a ruled table drawn by [`ruled_grid`]
#[derive(Debug, Clone, Copy)]
pub struct GridLayout {
    /// Distance from the page edge to the outer rule
    pub margin: i32,
    /// Rule pitch along x
    pub cell_w: i32,
    /// Rule pitch along y
    pub cell_h: i32,
    /// Rule thickness
    pub line_width: i32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            margin: 50,
            cell_w: 120,
            cell_h: 60,
            line_width: 3,
        }
    }
}

impl GridLayout {
    /// Page size that holds a `rows` x `cols` grid plus margins
    pub fn page_size(&self, rows: usize, cols: usize) -> (u32, u32) {
        let w = 2 * self.margin + cols as i32 * self.cell_w + self.line_width;
        let h = 2 * self.margin + rows as i32 * self.cell_h + self.line_width;
        (w as u32, h as u32)
    }

    /// Interior rectangle of cell (`row`, `col`), between the rules
    pub fn cell(&self, row: usize, col: usize) -> Block {
        Block::new_unchecked(
            self.margin + col as i32 * self.cell_w + self.line_width,
            self.margin + row as i32 * self.cell_h + self.line_width,
            self.cell_w - self.line_width,
            self.cell_h - self.line_width,
        )
    }

    /// All interior rectangles in reading order
    pub fn cells(&self, rows: usize, cols: usize) -> Vec<Block> {
        (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| self.cell(r, c))
            .collect()
    }
}

/// An empty white page
pub fn blank(width: u32, height: u32) -> TestResult<Pix> {
    Ok(Pix::new_filled(width, height, PixelDepth::Bit8, PAPER)?)
}

/// A page holding one fully ruled `rows` x `cols` table
pub fn ruled_grid(rows: usize, cols: usize, layout: &GridLayout) -> TestResult<Pix> {
    let (w, h) = layout.page_size(rows, cols);
    let page = blank(w, h)?;
    let mut pm = page.try_into_mut().unwrap_or_else(|p| p.to_mut());

    let grid_w = cols as i32 * layout.cell_w + layout.line_width;
    let grid_h = rows as i32 * layout.cell_h + layout.line_width;
    for r in 0..=rows as i32 {
        let y = layout.margin + r * layout.cell_h;
        pm.fill_block(
            &Block::new_unchecked(layout.margin, y, grid_w, layout.line_width),
            INK,
        );
    }
    for c in 0..=cols as i32 {
        let x = layout.margin + c * layout.cell_w;
        pm.fill_block(
            &Block::new_unchecked(x, layout.margin, layout.line_width, grid_h),
            INK,
        );
    }
    Ok(pm.into())
}

/// A page with rectangle outlines drawn inside each block
pub fn outlined(width: u32, height: u32, blocks: &[Block], line_width: i32) -> TestResult<Pix> {
    let page = blank(width, height)?;
    let mut pm = page.try_into_mut().unwrap_or_else(|p| p.to_mut());
    for b in blocks {
        pm.draw_block_outline(b, line_width, INK);
    }
    Ok(pm.into())
}

/// A page with solid ink rectangles
pub fn filled(width: u32, height: u32, blocks: &[Block]) -> TestResult<Pix> {
    let page = blank(width, height)?;
    let mut pm = page.try_into_mut().unwrap_or_else(|p| p.to_mut());
    for b in blocks {
        pm.fill_block(b, INK);
    }
    Ok(pm.into())
}

/// A page with checkerboard-textured photo blocks
///
/// The texture gives every block a dense edge response, like a product
/// photograph has.
pub fn photos(width: u32, height: u32, blocks: &[Block], square: i32) -> TestResult<Pix> {
    let page = blank(width, height)?;
    let mut pm = page.try_into_mut().unwrap_or_else(|p| p.to_mut());
    let square = square.max(1);
    for b in blocks {
        let Some(b) = b.clip(width as i32, height as i32) else {
            continue;
        };
        for y in b.y..b.bottom() {
            for x in b.x..b.right() {
                let on = ((x - b.x) / square + (y - b.y) / square) % 2 == 0;
                pm.set_pixel_unchecked(x as u32, y as u32, if on { INK } else { 160 });
            }
        }
    }
    Ok(pm.into())
}

/// Write `pix` as `{dir}/{name}` (PNG) and return the path
pub fn save(pix: &Pix, dir: &Path, name: &str) -> TestResult<PathBuf> {
    let path = dir.join(name);
    catseg_io::write_png(pix, &path).map_err(|e| TestError::ImageWrite {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ruled_grid_geometry() {
        let layout = GridLayout::default();
        let page = ruled_grid(2, 3, &layout).unwrap();
        assert_eq!((page.width(), page.height()), layout.page_size(2, 3));

        // rule corner is ink, cell interior is paper
        assert_eq!(page.get_pixel(50, 50), Some(INK));
        let c = layout.cell(1, 2);
        assert_eq!(page.get_pixel((c.x + 5) as u32, (c.y + 5) as u32), Some(PAPER));
        assert_eq!(layout.cells(2, 3).len(), 6);
    }
}
