//! Pix regression test
//!
//! Covers depth conversion, clipping, and the binary operations the
//! detectors build on.
//!
//! Run with:
//! ```
//! cargo test -p catseg-core --test pix_reg
//! ```

use catseg_core::{Block, Pix, PixelDepth, color};
use catseg_test::RegParams;

#[test]
fn pix_reg() {
    let mut rp = RegParams::new("pix");

    // --- gray conversion ---
    let rgb = Pix::new_filled(4, 4, PixelDepth::Bit32, color::compose_rgb(200, 100, 50)).unwrap();
    let gray = rgb.convert_to_8().unwrap();
    rp.compare_values(8.0, gray.depth().bits() as f64, 0.0);
    // 0.299*200 + 0.587*100 + 0.114*50 = 124.2
    rp.compare_values(124.0, gray.get_pixel(2, 2).unwrap() as f64, 0.0);

    let gray_again = gray.convert_to_8().unwrap();
    rp.compare_pix(&gray, &gray_again);

    // --- clipping ---
    let mut pm = Pix::new(100, 80, PixelDepth::Bit8).unwrap().to_mut();
    pm.fill_block(&Block::new_unchecked(10, 10, 20, 20), 200);
    let page: Pix = pm.into();

    let crop = page.clip_rectangle(6, 6, 28, 28).unwrap();
    rp.compare_values(28.0, crop.width() as f64, 0.0);
    rp.compare_values(28.0, crop.height() as f64, 0.0);
    rp.compare_values(0.0, crop.get_pixel(0, 0).unwrap() as f64, 0.0);
    rp.compare_values(200.0, crop.get_pixel(4, 4).unwrap() as f64, 0.0);

    // clamped at the right edge
    let edge = page.clip_rectangle(90, 70, 40, 40).unwrap();
    rp.compare_values(10.0, edge.width() as f64, 0.0);
    rp.compare_values(10.0, edge.height() as f64, 0.0);

    let off = page.clip_block(&Block::new_unchecked(200, 200, 5, 5));
    assert!(off.is_err());

    // --- binary ops ---
    let mut a = Pix::new(10, 10, PixelDepth::Bit1).unwrap().to_mut();
    a.fill_block(&Block::new_unchecked(0, 0, 5, 10), 1);
    let a: Pix = a.into();
    let mut b = Pix::new(10, 10, PixelDepth::Bit1).unwrap().to_mut();
    b.fill_block(&Block::new_unchecked(0, 0, 10, 5), 1);
    let b: Pix = b.into();

    rp.compare_values(75.0, a.or(&b).unwrap().count_pixels() as f64, 0.0);
    rp.compare_values(25.0, a.and(&b).unwrap().count_pixels() as f64, 0.0);
    rp.compare_values(50.0, a.invert().unwrap().count_pixels() as f64, 0.0);
    rp.compare_values(
        10.0,
        a.count_pixels_in_block(&Block::new_unchecked(3, 0, 4, 5)) as f64,
        0.0,
    );

    let other = Pix::new(10, 11, PixelDepth::Bit1).unwrap();
    assert!(a.or(&other).is_err());

    assert!(rp.cleanup(), "pix regression test failed");
}

#[test]
fn pix_shared_ownership() {
    let pix = Pix::new(8, 8, PixelDepth::Bit8).unwrap();
    let shared = pix.clone();
    assert_eq!(pix.ref_count(), 2);

    // shared pix cannot be mutated in place
    let pix = pix.try_into_mut().unwrap_err();
    drop(shared);
    let mut pm = pix.try_into_mut().unwrap();
    pm.set_pixel(1, 1, 77).unwrap();
    assert!(pm.set_pixel(8, 0, 1).is_err());
    let pix: Pix = pm.into();
    assert_eq!(pix.get_pixel(1, 1), Some(77));
}
