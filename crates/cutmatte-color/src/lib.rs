//! cutmatte-color - Luminance-based alpha matting
//!
//! Separates a design from its background by turning luminance into
//! alpha. Exactly one policy runs per pipeline, chosen by
//! [`MattingMethod`](cutmatte_core::MattingMethod):
//!
//! - **BlendIf**: cut below `min`, soft ramp up to `max`
//! - **ColorRange**: hard threshold
//! - **Channels**: levels remap and binarize (posterizes RGB)

pub mod matte;

pub use matte::{apply_matting, blend_if, channels, color_range};
