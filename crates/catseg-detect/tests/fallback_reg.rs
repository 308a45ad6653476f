//! Fallback and photo detector regression test
//!
//! Run with:
//! ```
//! cargo test -p catseg-detect --test fallback_reg
//! ```

use catseg_core::Block;
use catseg_detect::{
    Detector, FallbackDetector, FallbackOptions, ImageDetector, PageImage, Strategy,
};
use catseg_test::{RegParams, pages};

fn covers(outer: &Block, inner: &Block, slack: i32) -> bool {
    outer.x <= inner.x
        && outer.y <= inner.y
        && outer.right() >= inner.right()
        && outer.bottom() >= inner.bottom()
        && inner.expand(slack).intersect(outer) == Some(*outer)
}

#[test]
fn fallback_reg() {
    let mut rp = RegParams::new("fallback");
    let detector = FallbackDetector::default();

    let shapes = [
        Block::new_unchecked(300, 50, 120, 90),
        Block::new_unchecked(50, 50, 120, 90),
        Block::new_unchecked(50, 250, 150, 100),
        // too small once dilated
        Block::new_unchecked(400, 400, 20, 20),
    ];
    let page = PageImage::from_pix(pages::filled(520, 480, &shapes).unwrap(), "shapes");
    let result = detector.detect(&page).unwrap();
    assert_eq!(result.strategy, Strategy::Fallback);
    rp.compare_values(3.0, result.len() as f64, 0.0);

    // reading order
    for pair in result.blocks.windows(2) {
        assert!((pair[0].y, pair[0].x) <= (pair[1].y, pair[1].x));
    }
    let expected = [shapes[1], shapes[0], shapes[2]];
    for (found, shape) in result.blocks.iter().zip(&expected) {
        assert!(covers(found, shape, 8), "{:?} does not cover {:?}", found, shape);
    }

    // blank page: nothing
    let blank = PageImage::from_pix(pages::blank(300, 200).unwrap(), "blank");
    rp.compare_values(0.0, detector.detect(&blank).unwrap().len() as f64, 0.0);

    // raising the size floor drops the 120x90 shapes
    let strict = FallbackDetector::new(FallbackOptions::default().with_min_size(140, 60));
    rp.compare_values(1.0, strict.detect(&page).unwrap().len() as f64, 0.0);

    assert!(rp.cleanup(), "fallback regression test failed");
}

#[test]
fn photo_reg() {
    let mut rp = RegParams::new("photo");

    let photos = [
        Block::new_unchecked(400, 60, 120, 120),
        Block::new_unchecked(50, 50, 200, 150),
        // strip: aspect ratio too large
        Block::new_unchecked(50, 300, 700, 105),
        // too small
        Block::new_unchecked(600, 500, 80, 80),
    ];
    let page = PageImage::from_pix(pages::photos(800, 650, &photos, 8).unwrap(), "photos");
    let found = ImageDetector::default().detect(&page).unwrap();
    rp.write_pix(page.pix()).unwrap();

    rp.compare_values(2.0, found.len() as f64, 0.0);
    assert!(covers(&found[0], &photos[1], 8));
    assert!(covers(&found[1], &photos[0], 8));
    assert!(found.iter().all(|b| b.kind.is_none()));

    let blank = PageImage::from_pix(pages::blank(300, 300).unwrap(), "blank");
    assert!(ImageDetector::default().detect(&blank).unwrap().is_empty());

    assert!(rp.cleanup(), "photo regression test failed");
}
