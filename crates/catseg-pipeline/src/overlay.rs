//! Debug overlay rendering
//!
//! Cells are outlined in red, photos in blue, product rows in green.

use crate::PipelineResult;
use catseg_core::{Block, GridCell, Pix, color};
use catseg_grid::ProductRow;

const CELL_COLOR: (u8, u8, u8) = (220, 30, 30);
const PHOTO_COLOR: (u8, u8, u8) = (30, 60, 220);
const PRODUCT_COLOR: (u8, u8, u8) = (30, 160, 60);
const LINE_WIDTH: i32 = 2;

/// Outline detections on a color copy of `pix`.
pub fn render_overlay(
    pix: &Pix,
    cells: &[GridCell],
    photos: &[Block],
    products: &[ProductRow],
) -> PipelineResult<Pix> {
    let color_pix = pix.convert_to_32()?;
    let mut pm = color_pix.try_into_mut().unwrap_or_else(|p| p.to_mut());

    let (r, g, b) = PRODUCT_COLOR;
    for bounds in products.iter().filter_map(ProductRow::bounds) {
        pm.draw_block_outline(&bounds.expand(LINE_WIDTH), 1, color::compose_rgb(r, g, b));
    }
    let (r, g, b) = PHOTO_COLOR;
    for photo in photos {
        pm.draw_block_outline(photo, LINE_WIDTH, color::compose_rgb(r, g, b));
    }
    let (r, g, b) = CELL_COLOR;
    for cell in cells {
        pm.draw_block_outline(&cell.block, LINE_WIDTH, color::compose_rgb(r, g, b));
    }
    Ok(pm.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use catseg_core::PixelDepth;

    #[test]
    fn test_cells_outlined_in_red() {
        let page = Pix::new_filled(100, 80, PixelDepth::Bit8, 255).unwrap();
        let cell = GridCell::new(Block::new_unchecked(10, 10, 30, 20), 0, 0);
        let out = render_overlay(&page, &[cell], &[], &[]).unwrap();
        assert_eq!(out.depth(), PixelDepth::Bit32);
        assert_eq!(out.get_rgb(10, 10), Some((220, 30, 30)));
        assert_eq!(out.get_rgb(20, 20), Some((255, 255, 255)));
        // source untouched
        assert_eq!(page.get_pixel(10, 10), Some(255));
    }
}
