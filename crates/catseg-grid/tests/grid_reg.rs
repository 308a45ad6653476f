//! Grid, product row, and photo assignment regression test
//!
//! Run with:
//! ```
//! cargo test -p catseg-grid --test grid_reg
//! ```

use catseg_core::{Block, GridCell};
use catseg_grid::{AssignPolicy, GridBuilder, ProductRow, ProductSegmenter, assign_images};
use catseg_test::RegParams;
use catseg_test::pages::GridLayout;

#[test]
fn grid_reg() {
    let mut rp = RegParams::new("grid");
    let builder = GridBuilder::default();
    let layout = GridLayout::default();

    // --- ruled-grid interiors come back as N rows of M columns ---
    for (rows, cols) in [(3, 4), (5, 2), (1, 6)] {
        let mut blocks = layout.cells(rows, cols);
        blocks.reverse();
        let cells = builder.build(&blocks);
        rp.compare_values((rows * cols) as f64, cells.len() as f64, 0.0);
        for (i, cell) in cells.iter().enumerate() {
            rp.compare_values((i / cols) as f64, cell.row as f64, 0.0);
            rp.compare_values((i % cols) as f64, cell.col as f64, 0.0);
        }
        rp.compare_blocks(&layout.cells(rows, cols), &to_blocks(&cells));

        // --- idempotent on its own output ---
        let again = builder.rebuild(&cells);
        assert_eq!(again, cells);
    }

    // --- jittered, unequal rows ---
    let blocks = [
        Block::new_unchecked(400, 212, 90, 40),
        Block::new_unchecked(20, 8, 90, 40),
        Block::new_unchecked(130, 0, 90, 40),
        Block::new_unchecked(20, 200, 90, 40),
        Block::new_unchecked(240, 15, 90, 40),
    ];
    let cells = builder.build(&blocks);
    let shape: Vec<(usize, usize)> = cells.iter().map(|c| (c.row, c.col)).collect();
    assert_eq!(shape, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]);
    rp.compare_values(20.0, cells[0].block.x as f64, 0.0);
    rp.compare_values(400.0, cells[4].block.x as f64, 0.0);
    assert_eq!(builder.rebuild(&cells), cells);

    // rows never go back up the page
    for pair in cells.windows(2) {
        assert!(pair[0].row <= pair[1].row);
    }

    assert!(rp.cleanup(), "grid regression test failed");
}

#[test]
fn product_reg() {
    let mut rp = RegParams::new("product");

    // two product bands, one straggler far below
    let blocks = [
        Block::new_unchecked(20, 520, 200, 30),
        Block::new_unchecked(20, 100, 200, 30),
        Block::new_unchecked(240, 110, 120, 30),
        Block::new_unchecked(20, 300, 200, 30),
        Block::new_unchecked(240, 320, 120, 30),
    ];
    let rows = ProductSegmenter::default().segment(&blocks);
    rp.compare_values(3.0, rows.len() as f64, 0.0);
    rp.compare_values(2.0, rows[0].blocks.len() as f64, 0.0);
    rp.compare_values(120.0, rows[0].representative_y, 0.0);
    rp.compare_values(325.0, rows[1].representative_y, 0.0);
    rp.compare_values(535.0, rows[2].representative_y, 0.0);

    let json = serde_json::to_value(&rows[2]).unwrap();
    assert_eq!(json["representative_y"], 535.0);
    assert_eq!(json["blocks"][0]["y"], 520);

    assert!(rp.cleanup(), "product regression test failed");
}

#[test]
fn assign_reg() {
    let mut rp = RegParams::new("assign");

    let product_at = |y: i32| ProductRow::new(vec![Block::new_unchecked(10, y - 15, 200, 30)]);
    let products = [product_at(100), product_at(300)];
    rp.compare_values(100.0, products[0].representative_y, 0.0);
    rp.compare_values(300.0, products[1].representative_y, 0.0);

    // one photo centered at y=150 serves both products
    let photo = Block::new_unchecked(400, 100, 120, 100);
    rp.compare_values(150.0, photo.center_y(), 0.0);
    let assigned = assign_images(&products, &[photo], AssignPolicy::default());
    assert_eq!(assigned, vec![Some(0), Some(0)]);

    // exclusive policy leaves the farther product without a photo
    let assigned = assign_images(&products, &[photo], AssignPolicy::Exclusive);
    assert_eq!(assigned, vec![Some(0), None]);

    // with a second photo each product gets its own under both policies
    let lower = Block::new_unchecked(400, 260, 120, 100);
    let photos = [photo, lower];
    for policy in [AssignPolicy::Nearest, AssignPolicy::Exclusive] {
        assert_eq!(
            assign_images(&products, &photos, policy),
            vec![Some(0), Some(1)]
        );
    }

    assert_eq!(
        serde_json::to_string(&AssignPolicy::Exclusive).unwrap(),
        "\"exclusive\""
    );

    assert!(rp.cleanup(), "assign regression test failed");
}

fn to_blocks(cells: &[GridCell]) -> Vec<Block> {
    cells.iter().map(|c| c.block).collect()
}
