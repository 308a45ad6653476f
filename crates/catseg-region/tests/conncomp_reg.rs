//! Connected component regression test
//!
//! Run with:
//! ```
//! cargo test -p catseg-region --test conncomp_reg
//! ```

use catseg_core::{Block, Pix, PixelDepth};
use catseg_region::{ConnectivityType, external_bounding_boxes, find_connected_components};
use catseg_test::{RegParams, pages};

fn ink_mask(gray: &Pix) -> Pix {
    let data = gray.data().iter().map(|&v| (v < 128) as u8).collect();
    Pix::from_raw(gray.width(), gray.height(), PixelDepth::Bit1, data).unwrap()
}

#[test]
fn conncomp_reg() {
    let mut rp = RegParams::new("conncomp");

    // --- a ruled grid is one ink component ---
    let layout = pages::GridLayout::default();
    let mask = ink_mask(&pages::ruled_grid(3, 4, &layout).unwrap());
    let ink = find_connected_components(&mask, ConnectivityType::EightWay).unwrap();
    rp.compare_values(1.0, ink.len() as f64, 0.0);

    // --- its background splits into the outside plus one hole per cell ---
    let paper = mask.invert().unwrap();
    let bg = find_connected_components(&paper, ConnectivityType::FourWay).unwrap();
    rp.compare_values(13.0, bg.len() as f64, 0.0);
    let outside: Vec<_> = bg.iter().filter(|c| c.touches_border).collect();
    rp.compare_values(1.0, outside.len() as f64, 0.0);

    let mut holes: Vec<Block> = bg
        .iter()
        .filter(|c| !c.touches_border)
        .map(|c| c.bounds)
        .collect();
    catseg_core::sort_reading_order(&mut holes);
    rp.compare_blocks(&layout.cells(3, 4), &holes);

    for c in bg.iter().filter(|c| !c.touches_border) {
        rp.compare_values(
            c.bounds.area() as f64,
            c.pixel_count as f64,
            0.0,
        );
    }

    // --- external boxes: one per outline, nested content skipped ---
    let outlines = [
        Block::new_unchecked(20, 20, 320, 100),
        Block::new_unchecked(20, 150, 320, 100),
    ];
    let page = pages::outlined(400, 300, &outlines, 3).unwrap();
    let mut pm = page.to_mut();
    pm.fill_block(&Block::new_unchecked(60, 50, 30, 20), pages::INK);
    let page: Pix = pm.into();
    let boxes = external_bounding_boxes(&ink_mask(&page)).unwrap();
    rp.compare_blocks(&outlines, &boxes);

    assert!(rp.cleanup(), "conncomp regression test failed");
}
