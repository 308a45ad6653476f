//! Connected component analysis
//!
//! Two-pass labeling with a union-find (disjoint set) forest. Components
//! are numbered from 1 in raster order of their first pixel.

use crate::error::{RegionError, RegionResult};
use catseg_core::{Block, Pix, PixelDepth};

/// Connectivity type for component analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectivityType {
    /// 4-way connectivity (up, down, left, right)
    #[default]
    FourWay,
    /// 8-way connectivity (includes diagonals)
    EightWay,
}

/// A connected component in an image
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedComponent {
    /// Unique label for this component, starting at 1
    pub label: u32,
    /// Number of pixels in this component
    pub pixel_count: u32,
    /// Bounding box of this component
    pub bounds: Block,
    /// Whether any pixel lies on the image border
    pub touches_border: bool,
}

impl ConnectedComponent {
    /// Create a new connected component
    pub fn new(label: u32, pixel_count: u32, bounds: Block, touches_border: bool) -> Self {
        Self {
            label,
            pixel_count,
            bounds,
            touches_border,
        }
    }
}

struct UnionFind {
    parent: Vec<u32>,
}

impl UnionFind {
    fn new() -> Self {
        // slot 0 is the background
        Self { parent: vec![0] }
    }

    fn make(&mut self) -> u32 {
        let id = self.parent.len() as u32;
        self.parent.push(id);
        id
    }

    fn find(&mut self, mut x: u32) -> u32 {
        while self.parent[x as usize] != x {
            let grand = self.parent[self.parent[x as usize] as usize];
            self.parent[x as usize] = grand;
            x = grand;
        }
        x
    }

    fn union(&mut self, a: u32, b: u32) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            // keep the older label as root
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi as usize] = lo;
        }
    }
}

/// Label all connected components of the foreground (non-zero pixels)
///
/// Returns `(labels, count)`: a row-major label per pixel (0 for
/// background) and the number of components.
pub fn label_connected_components(
    pix: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<(Vec<u32>, u32)> {
    if pix.depth() != PixelDepth::Bit1 {
        return Err(RegionError::UnsupportedDepth {
            expected: "1 bpp",
            actual: pix.depth().bits(),
        });
    }
    let w = pix.width() as usize;
    let h = pix.height() as usize;
    let src = pix.data();
    let mut labels = vec![0u32; w * h];
    let mut uf = UnionFind::new();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            if src[i] == 0 {
                continue;
            }
            let mut neighbors = [0u32; 4];
            let mut n = 0;
            if x > 0 && labels[i - 1] != 0 {
                neighbors[n] = labels[i - 1];
                n += 1;
            }
            if y > 0 {
                if labels[i - w] != 0 {
                    neighbors[n] = labels[i - w];
                    n += 1;
                }
                if connectivity == ConnectivityType::EightWay {
                    if x > 0 && labels[i - w - 1] != 0 {
                        neighbors[n] = labels[i - w - 1];
                        n += 1;
                    }
                    if x + 1 < w && labels[i - w + 1] != 0 {
                        neighbors[n] = labels[i - w + 1];
                        n += 1;
                    }
                }
            }

            if n == 0 {
                labels[i] = uf.make();
            } else {
                let first = neighbors[0];
                labels[i] = first;
                for &other in &neighbors[1..n] {
                    uf.union(first, other);
                }
            }
        }
    }

    // resolve roots and renumber densely in order of first appearance
    let mut remap = vec![0u32; uf.parent.len()];
    let mut count = 0u32;
    for label in labels.iter_mut() {
        if *label == 0 {
            continue;
        }
        let root = uf.find(*label);
        if remap[root as usize] == 0 {
            count += 1;
            remap[root as usize] = count;
        }
        *label = remap[root as usize];
    }

    Ok((labels, count))
}

/// Find all connected components in a binary image
///
/// Components come back in raster order of their first pixel.
pub fn find_connected_components(
    pix: &Pix,
    connectivity: ConnectivityType,
) -> RegionResult<Vec<ConnectedComponent>> {
    let (labels, count) = label_connected_components(pix, connectivity)?;
    let w = pix.width() as usize;
    let h = pix.height() as usize;

    struct Acc {
        count: u32,
        x0: usize,
        y0: usize,
        x1: usize,
        y1: usize,
        border: bool,
    }
    let mut acc: Vec<Acc> = (0..count)
        .map(|_| Acc {
            count: 0,
            x0: usize::MAX,
            y0: usize::MAX,
            x1: 0,
            y1: 0,
            border: false,
        })
        .collect();

    for y in 0..h {
        for x in 0..w {
            let label = labels[y * w + x];
            if label == 0 {
                continue;
            }
            let a = &mut acc[label as usize - 1];
            a.count += 1;
            a.x0 = a.x0.min(x);
            a.y0 = a.y0.min(y);
            a.x1 = a.x1.max(x);
            a.y1 = a.y1.max(y);
            a.border |= x == 0 || y == 0 || x + 1 == w || y + 1 == h;
        }
    }

    Ok(acc
        .into_iter()
        .enumerate()
        .map(|(i, a)| {
            let bounds = Block::new_unchecked(
                a.x0 as i32,
                a.y0 as i32,
                (a.x1 - a.x0 + 1) as i32,
                (a.y1 - a.y0 + 1) as i32,
            );
            ConnectedComponent::new(i as u32 + 1, a.count, bounds, a.border)
        })
        .collect())
}
