//! Photo-to-product assignment
//!
//! Distance is measured between a product row's representative y and a
//! photo's vertical center.

use crate::ProductRow;
use catseg_core::Block;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How photos are shared between product rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AssignPolicy {
    /// Every product gets its nearest photo, even if another product
    /// already has it.
    #[default]
    Nearest,
    /// Each photo goes to at most one product. Pairs are taken greedily
    /// by ascending distance.
    Exclusive,
}

fn distance(product: &ProductRow, photo: &Block) -> f64 {
    (photo.center_y() - product.representative_y).abs()
}

/// Pick a photo index for every product row.
///
/// The result has one entry per product, `None` when no photo is left
/// (no photos at all, or all taken under [`AssignPolicy::Exclusive`]).
/// Equal distances resolve to the earlier photo, then the earlier product.
pub fn assign_images(
    products: &[ProductRow],
    photos: &[Block],
    policy: AssignPolicy,
) -> Vec<Option<usize>> {
    let assigned = match policy {
        AssignPolicy::Nearest => products.iter().map(|p| nearest(p, photos)).collect(),
        AssignPolicy::Exclusive => exclusive(products, photos),
    };
    debug!(
        products = products.len(),
        photos = photos.len(),
        ?policy,
        "photos assigned"
    );
    assigned
}

fn nearest(product: &ProductRow, photos: &[Block]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, photo) in photos.iter().enumerate() {
        let d = distance(product, photo);
        match best {
            Some((_, bd)) if d >= bd => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

fn exclusive(products: &[ProductRow], photos: &[Block]) -> Vec<Option<usize>> {
    let mut pairs: Vec<(f64, usize, usize)> = products
        .iter()
        .enumerate()
        .flat_map(|(p, product)| {
            photos
                .iter()
                .enumerate()
                .map(move |(i, photo)| (distance(product, photo), i, p))
        })
        .collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));

    let mut result = vec![None; products.len()];
    let mut taken = vec![false; photos.len()];
    for (_, photo, product) in pairs {
        if taken[photo] || result[product].is_some() {
            continue;
        }
        taken[photo] = true;
        result[product] = Some(photo);
    }
    result
}
