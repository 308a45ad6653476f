//! Strategy selection regression test
//!
//! Runs the real table and fallback detectors against synthetic pages
//! and a canned layout model, then checks which strategy wins.
//!
//! Run with:
//! ```
//! cargo test -p catseg-detect --test selector_reg
//! ```

use catseg_core::Block;
use catseg_detect::{
    DetectResult, Detector, FallbackDetector, LayoutDetector, LayoutModel, LayoutRegion,
    PageImage, Strategy, TableDetector, select, selector::MIN_TABLE_CELLS,
};
use catseg_test::pages::{self, GridLayout};
use catseg_test::RegParams;

/// Reports one table whose structure is a 2 x 5 grid of cells
struct TenCells;

impl LayoutModel for TenCells {
    fn name(&self) -> &str {
        "ten-cells"
    }

    fn detect_layout(&self, page: &PageImage) -> DetectResult<Vec<LayoutRegion>> {
        let w = page.width() as i32;
        let h = page.height() as i32;
        Ok(vec![LayoutRegion::new(
            "table",
            Block::new_unchecked(0, 0, w, h),
            0.9,
        )])
    }

    fn recognize_structure(
        &self,
        _page: &PageImage,
        table: &Block,
    ) -> DetectResult<Vec<LayoutRegion>> {
        let mut out = Vec::new();
        let rh = table.h / 2;
        let cw = table.w / 5;
        for r in 0..2 {
            out.push(LayoutRegion::new("row", Block::new_unchecked(0, r * rh, table.w, rh), 0.9));
        }
        for c in 0..5 {
            out.push(LayoutRegion::new("column", Block::new_unchecked(c * cw, 0, cw, table.h), 0.9));
        }
        Ok(out)
    }
}

fn run(page: &PageImage, with_layout: bool) -> catseg_detect::Selection {
    let table = TableDetector::default().detect(page).unwrap();
    let layout = with_layout.then(|| {
        LayoutDetector::with_model(TenCells, 0.5)
            .detect(page)
            .unwrap()
    });
    let fallback = FallbackDetector::default().detect(page).unwrap();
    select(table, layout, fallback, MIN_TABLE_CELLS)
}

#[test]
fn selector_reg() {
    let mut rp = RegParams::new("selector");
    let layout = GridLayout::default();

    // a 3-cell table outranks a 10-cell layout result
    let grid = PageImage::from_pix(pages::ruled_grid(1, 3, &layout).unwrap(), "grid");
    let chosen = run(&grid, true);
    assert_eq!(chosen.mode, Strategy::LineGrid);
    rp.compare_blocks(&layout.cells(1, 3), &chosen.cells);

    // too few table cells: the layout model takes over
    let pair = PageImage::from_pix(pages::ruled_grid(1, 2, &layout).unwrap(), "pair");
    let chosen = run(&pair, true);
    assert_eq!(chosen.mode, Strategy::LayoutModel);
    rp.compare_values(10.0, chosen.cells.len() as f64, 0.0);

    // without a layout model the fallback answers, even with nothing found
    let (w, h) = layout.page_size(2, 2);
    let blank = PageImage::from_pix(pages::blank(w, h).unwrap(), "blank");
    let chosen = run(&blank, false);
    assert_eq!(chosen.mode, Strategy::Fallback);
    rp.compare_values(0.0, chosen.cells.len() as f64, 0.0);

    assert!(rp.cleanup(), "selector regression test failed");
}
