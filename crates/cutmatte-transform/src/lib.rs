//! cutmatte-transform - Geometric transformations for cutmatte
//!
//! This crate provides the resizing used at load time: fit-within
//! downscaling of oversized uploads to a maximum dimension.

mod error;
pub mod scale;

pub use error::{TransformError, TransformResult};
pub use scale::{fit_dimensions, scale_to_fit};
