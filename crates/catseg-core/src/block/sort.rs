//! Block ordering

use super::Block;

/// Sort blocks top-to-bottom, then left-to-right.
///
/// The sort is stable: blocks with identical `(y, x)` keep their input
/// order.
pub fn sort_reading_order(blocks: &mut [Block]) {
    blocks.sort_by_key(|b| (b.y, b.x));
}

/// Sort blocks left-to-right (stable).
pub fn sort_by_x(blocks: &mut [Block]) {
    blocks.sort_by_key(|b| b.x);
}
