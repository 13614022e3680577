//! cutmatte-filter - Raster filtering operations
//!
//! This crate provides the tonal and spatial filters of the matting chain:
//!
//! - Global contrast through a tone reproduction curve (TRC)
//! - 3x3 median filter (impulse noise)
//! - Bilateral-style edge-preserving denoise
//! - Alpha box blur (summed-area table)
//! - Sharpening of the opaque design
//! - Local-contrast "text highlight" boost
//! - RGB inversion
//!
//! Every stage function takes `&Raster` and returns a new `Raster`; none of
//! them fails, and every arithmetic result is clamped to the channel range.

pub mod bilateral;
pub mod convolve;
pub mod edge;
pub mod enhance;
mod error;
pub mod kernel;
pub mod rank;

pub use error::{FilterError, FilterResult};
pub use kernel::{Kernel, SHARPEN_TAPS};

// Re-export commonly used functions
pub use bilateral::{bilateral_denoise, make_range_kernel};
pub use convolve::{alpha_accum, blur_alpha, convolve_opaque_rgb};
pub use edge::sharpen;
pub use enhance::{TrcLut, adjust_contrast, contrast_trc, invert, text_highlight, trc_map};
pub use rank::median_filter;
