//! catseg-region - Region analysis for catalog pages
//!
//! This crate provides:
//!
//! - **Connected component analysis** - labeling foreground regions with
//!   union-find, reporting pixel count, bounds, and border contact
//! - **External bounding boxes** - one rectangle per outer contour of the
//!   foreground, the way region proposals are taken from an edge mask
//!
//! # Examples
//!
//! ```
//! use catseg_region::{find_connected_components, ConnectivityType};
//! use catseg_core::{Pix, PixelDepth};
//!
//! let pix = Pix::new(100, 100, PixelDepth::Bit1).unwrap();
//! let mut pix_mut = pix.try_into_mut().unwrap();
//!
//! pix_mut.set_pixel(10, 10, 1).unwrap();
//! pix_mut.set_pixel(11, 10, 1).unwrap();
//! pix_mut.set_pixel(50, 50, 1).unwrap();
//!
//! let pix: Pix = pix_mut.into();
//!
//! let components = find_connected_components(&pix, ConnectivityType::FourWay).unwrap();
//! assert_eq!(components.len(), 2);
//! ```

pub mod conncomp;
pub mod contour;
mod error;

pub use conncomp::{
    ConnectedComponent, ConnectivityType, find_connected_components, label_connected_components,
};
pub use contour::external_bounding_boxes;
pub use error::{RegionError, RegionResult};
