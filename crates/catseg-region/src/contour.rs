//! Outer contours as bounding boxes
//!
//! The bounding box of an outer contour equals the bounding box of the
//! 8-connected component it traces. A component counts as outer when it
//! touches the image border or borders the background region connected to
//! the border; anything sitting inside another component's hole is
//! skipped, as are the holes themselves.

use crate::conncomp::{ConnectivityType, find_connected_components, label_connected_components};
use crate::error::RegionResult;
use catseg_core::{Block, Pix};

/// Bounding boxes of the external contours of the foreground
///
/// One box per outer 8-connected component, in raster order of the
/// component's first pixel.
pub fn external_bounding_boxes(pix: &Pix) -> RegionResult<Vec<Block>> {
    let components = find_connected_components(pix, ConnectivityType::EightWay)?;
    if components.is_empty() {
        return Ok(Vec::new());
    }
    let (fg_labels, _) = label_connected_components(pix, ConnectivityType::EightWay)?;

    // background uses the dual connectivity
    let background = pix.invert()?;
    let bg_components = find_connected_components(&background, ConnectivityType::FourWay)?;
    let (bg_labels, _) = label_connected_components(&background, ConnectivityType::FourWay)?;
    let mut outer_bg = vec![false; bg_components.len() + 1];
    for c in &bg_components {
        outer_bg[c.label as usize] = c.touches_border;
    }

    let w = pix.width() as usize;
    let h = pix.height() as usize;
    let mut outer = vec![false; components.len() + 1];
    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let label = fg_labels[i] as usize;
            if label == 0 || outer[label] {
                continue;
            }
            if x == 0 || y == 0 || x + 1 == w || y + 1 == h {
                outer[label] = true;
                continue;
            }
            outer[label] = [i - 1, i + 1, i - w, i + w]
                .into_iter()
                .any(|j| fg_labels[j] == 0 && outer_bg[bg_labels[j] as usize]);
        }
    }

    Ok(components
        .into_iter()
        .filter(|c| outer[c.label as usize])
        .map(|c| c.bounds)
        .collect())
}
