//! cutmatte-morph - Morphological cleanup of the alpha channel
//!
//! - Erosion: shrink the opaque region by one ring per pass
//! - Dilation: grow it back, copying color from the opaque neighbor
//!
//! Opacity means alpha >= 128. Both operations are double-buffered per
//! pass and never change the raster size.

pub mod alpha;

pub use alpha::{NEIGHBORS_8, dilate_alpha, erode_alpha};
