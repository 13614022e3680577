//! cutmatte Core - Basic data structures for logo matting
//!
//! This crate provides the fundamental types shared by every stage of the
//! matting pipeline:
//!
//! - [`Raster`] / [`RasterMut`] - RGBA8 image container (immutable / mutable)
//! - [`PipelineParams`] / [`MattingMethod`] - Parameter set for one run
//! - [`color`] - Channel indices, luminance and clamping helpers
//! - [`Error`] - Unified error type

pub mod error;
pub mod params;
pub mod raster;

pub use error::{Error, Result};
pub use params::{MattingMethod, PipelineParams, limits};
pub use raster::{BYTES_PER_PIXEL, Raster, RasterMut, buffer_len};

/// Channel indices and helper functions for RGBA8 pixels.
pub mod color {
    /// Red channel (byte 0)
    pub const RED: usize = 0;
    /// Green channel (byte 1)
    pub const GREEN: usize = 1;
    /// Blue channel (byte 2)
    pub const BLUE: usize = 2;
    /// Alpha channel (byte 3)
    pub const ALPHA: usize = 3;

    /// Alpha at or above this value counts as opaque (part of the design).
    pub const OPAQUE_THRESHOLD: u8 = 128;

    /// Fully opaque alpha.
    pub const ALPHA_OPAQUE: u8 = 255;
    /// Fully transparent alpha.
    pub const ALPHA_TRANSPARENT: u8 = 0;

    /// True if `alpha` counts as opaque.
    #[inline]
    pub fn is_opaque(alpha: u8) -> bool {
        alpha >= OPAQUE_THRESHOLD
    }

    /// Mean of the three color channels.
    #[inline]
    pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
        (r as f32 + g as f32 + b as f32) / 3.0
    }

    /// Luminance of the pixel starting at `px[0]`.
    #[inline]
    pub fn pixel_luminance(px: &[u8]) -> f32 {
        luminance(px[RED], px[GREEN], px[BLUE])
    }

    /// Round and clamp a float into a channel value. NaN maps to 0.
    #[inline]
    pub fn clamp_channel(value: f32) -> u8 {
        if value.is_nan() {
            return 0;
        }
        value.round().clamp(0.0, 255.0) as u8
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_luminance() {
            assert_eq!(luminance(0, 0, 0), 0.0);
            assert_eq!(luminance(255, 255, 255), 255.0);
            assert_eq!(luminance(30, 60, 90), 60.0);
        }

        #[test]
        fn test_clamp_channel() {
            assert_eq!(clamp_channel(-4.0), 0);
            assert_eq!(clamp_channel(300.0), 255);
            assert_eq!(clamp_channel(127.5), 128);
            assert_eq!(clamp_channel(f32::NAN), 0);
        }

        #[test]
        fn test_is_opaque() {
            assert!(!is_opaque(127));
            assert!(is_opaque(128));
        }
    }
}
