//! Image I/O regression test
//!
//! Run with:
//! ```
//! cargo test -p catseg-io --test io_reg
//! ```

use catseg_core::{ImageFormat, PixelDepth, color};
use catseg_io::{IoError, detect_format, read_image, write_image, write_png};
use catseg_test::{RegParams, pages};

#[test]
fn io_reg() {
    let mut rp = RegParams::new("io");
    let dir = tempfile::tempdir().unwrap();

    // --- gray page round trip through a file ---
    let page = pages::ruled_grid(2, 2, &pages::GridLayout::default()).unwrap();
    let path = dir.path().join("page.png");
    write_png(&page, &path).unwrap();

    assert_eq!(detect_format(&path).unwrap(), ImageFormat::Png);
    let back = read_image(&path).unwrap();
    rp.compare_pix(&page, &back);
    assert_eq!(back.informat(), ImageFormat::Png);

    // --- RGBA ---
    let rgb = catseg_core::Pix::new_filled(
        7,
        3,
        PixelDepth::Bit32,
        color::compose_rgb(10, 20, 30),
    )
    .unwrap();
    let path = dir.path().join("rgb.png");
    write_image(&rgb, &path, ImageFormat::Png).unwrap();
    let back = read_image(&path).unwrap();
    rp.compare_pix(&rgb, &back);

    assert!(rp.cleanup(), "io regression test failed");
}

#[test]
fn io_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = read_image(dir.path().join("nope.png"));
    assert!(matches!(missing, Err(IoError::Io(_))));

    let junk = dir.path().join("junk.png");
    std::fs::write(&junk, b"not an image at all").unwrap();
    assert!(matches!(read_image(&junk), Err(IoError::UnsupportedFormat(_))));

    let page = pages::blank(4, 4).unwrap();
    let jpg = dir.path().join("out.jpg");
    assert!(write_image(&page, &jpg, ImageFormat::Jpeg).is_err());
}
