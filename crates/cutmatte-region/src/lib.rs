//! cutmatte-region - Connected component analysis
//!
//! This crate provides region analysis on the opaque part of a raster:
//!
//! - 4-connected component search with an iterative fill
//! - Despeckle: removal of components below a minimum size

pub mod conncomp;
pub mod despeckle;

pub use conncomp::{ConnectedComponent, find_opaque_components};
pub use despeckle::{DespeckleStats, despeckle, despeckle_with_stats};
