//! Table detector regression test
//!
//! Run with:
//! ```
//! cargo test -p catseg-detect --test table_reg
//! ```

use catseg_core::{Block, Pix, PixelDepth, color};
use catseg_detect::{Detector, PageImage, Strategy, TableDetector, TableOptions, TableVariant};
use catseg_test::{RegParams, pages};

#[test]
fn table_reg() {
    let mut rp = RegParams::new("table");
    let detector = TableDetector::default();

    // --- clean ruled grids: every enclosed cell, in reading order ---
    let layout = pages::GridLayout::default();
    for (rows, cols) in [(3, 4), (5, 2), (1, 3)] {
        let page = PageImage::from_pix(pages::ruled_grid(rows, cols, &layout).unwrap(), "grid");
        let result = detector.detect(&page).unwrap();
        assert_eq!(result.strategy, Strategy::LineGrid);
        rp.compare_values((rows * cols) as f64, result.len() as f64, 0.0);
        rp.compare_blocks(&layout.cells(rows, cols), &result.blocks);
    }

    // --- color input goes through the gray conversion ---
    let gray = pages::ruled_grid(2, 2, &layout).unwrap();
    let rgb = gray.convert_to_32().unwrap();
    let mut pm = rgb.to_mut();
    pm.fill_block(&Block::new_unchecked(0, 0, 10, 10), color::compose_rgb(250, 250, 240));
    let page = PageImage::from_pix(pm.into(), "color");
    rp.compare_values(4.0, detector.detect(&page).unwrap().len() as f64, 0.0);

    // --- blank page and tiny tables are "no table", not errors ---
    let blank = PageImage::from_pix(pages::blank(600, 400).unwrap(), "blank");
    rp.compare_values(0.0, detector.detect(&blank).unwrap().len() as f64, 0.0);

    let two = PageImage::from_pix(pages::ruled_grid(1, 2, &layout).unwrap(), "two");
    rp.compare_values(0.0, detector.detect(&two).unwrap().len() as f64, 0.0);
    let lenient = TableDetector::new(TableOptions::default().with_min_cells(2));
    rp.compare_values(2.0, lenient.detect(&two).unwrap().len() as f64, 0.0);

    // --- cells at or under the size limits are dropped ---
    let narrow = pages::GridLayout {
        cell_w: 43,
        ..layout
    };
    let page = PageImage::from_pix(pages::ruled_grid(2, 3, &narrow).unwrap(), "narrow");
    rp.compare_values(0.0, detector.detect(&page).unwrap().len() as f64, 0.0);

    assert!(rp.cleanup(), "table regression test failed");
}

#[test]
fn table_row_regions() {
    let mut rp = RegParams::new("table_rows");

    let rows = [
        Block::new_unchecked(40, 30, 500, 100),
        Block::new_unchecked(40, 160, 500, 100),
        Block::new_unchecked(40, 290, 500, 100),
    ];
    let mut all = rows.to_vec();
    // too short to be a row region
    all.push(Block::new_unchecked(40, 420, 500, 60));
    let page = PageImage::from_pix(pages::outlined(600, 520, &all, 3).unwrap(), "rows");

    let detector =
        TableDetector::new(TableOptions::default().with_variant(TableVariant::RowRegions));
    let result = detector.detect(&page).unwrap();
    rp.compare_blocks(&rows, &result.blocks);

    // the grid variant reports each box interior instead
    let grid = TableDetector::default().detect(&page).unwrap();
    rp.compare_values(4.0, grid.len() as f64, 0.0);

    assert!(rp.cleanup(), "table_rows regression test failed");
}

#[test]
fn table_rejects_bad_options() {
    let page = PageImage::from_pix(Pix::new(50, 50, PixelDepth::Bit8).unwrap(), "p");
    let detector = TableDetector::new(TableOptions {
        block_size: 4,
        ..TableOptions::default()
    });
    assert!(detector.detect(&page).is_err());
}
