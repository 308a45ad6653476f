//! Filter regression test
//!
//! Run with:
//! ```
//! cargo test -p catseg-filter --test edge_reg
//! ```

use catseg_core::Block;
use catseg_filter::{adaptive_threshold_mean, canny, gaussian_blur};
use catseg_test::{RegParams, pages};

#[test]
fn edge_reg() {
    let mut rp = RegParams::new("edge");

    // --- blank page: nothing anywhere ---
    let blank = pages::blank(200, 150).unwrap();
    let blurred = gaussian_blur(&blank, 5, 0.0).unwrap();
    rp.compare_pix(&blank, &blurred);
    rp.compare_values(0.0, canny(&blurred, 50.0, 150.0).unwrap().count_pixels() as f64, 0.0);
    rp.compare_values(
        0.0,
        adaptive_threshold_mean(&blank, 15, 2.0).unwrap().count_pixels() as f64,
        0.0,
    );

    // --- solid square: edges hug the border ---
    let square = Block::new_unchecked(60, 40, 80, 60);
    let page = pages::filled(200, 150, &[square]).unwrap();
    let edges = canny(&gaussian_blur(&page, 5, 0.0).unwrap(), 50.0, 150.0).unwrap();
    rp.write_pix(&edges).unwrap();

    let n = edges.count_pixels();
    assert!(n > 0);
    let ring = square.expand(3);
    rp.compare_values(n as f64, edges.count_pixels_in_block(&ring) as f64, 0.0);
    // interior is flat
    rp.compare_values(
        0.0,
        edges.count_pixels_in_block(&square.expand(-6)) as f64,
        0.0,
    );
    // every side contributes
    for probe in [
        Block::new_unchecked(90, 35, 20, 10),
        Block::new_unchecked(90, 95, 20, 10),
        Block::new_unchecked(55, 60, 10, 20),
        Block::new_unchecked(135, 60, 10, 20),
    ] {
        assert!(edges.count_pixels_in_block(&probe) > 0, "no edge in {:?}", probe);
    }

    // --- ruled grid: rules become ink ---
    let layout = pages::GridLayout::default();
    let grid = pages::ruled_grid(2, 2, &layout).unwrap();
    let ink = adaptive_threshold_mean(&grid, 15, 2.0).unwrap();
    let c = layout.cell(0, 0);
    rp.compare_values(0.0, ink.count_pixels_in_block(&c.expand(-2)) as f64, 0.0);
    assert_eq!(ink.get_pixel(layout.margin as u32 + 1, (c.y + 10) as u32), Some(1));

    assert!(rp.cleanup(), "edge regression test failed");
}
