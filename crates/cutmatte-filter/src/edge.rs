//! Edge enhancement
//!
//! Sharpening of the opaque design using [`Kernel::sharpen`].

use crate::Kernel;
use crate::convolve::convolve_opaque_rgb;
use cutmatte_core::Raster;

/// Sharpen the RGB of opaque pixels.
///
/// The kernel response is scaled by `intensity / 10` and added to each
/// channel. `intensity <= 0` (or non-finite) returns the input unchanged.
pub fn sharpen(raster: &Raster, intensity: f32) -> Raster {
    if !(intensity.is_finite() && intensity > 0.0) {
        return raster.clone();
    }
    convolve_opaque_rgb(raster, &Kernel::sharpen(), intensity / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sharpen_zero_identity() {
        let r = Raster::new_filled(3, 3, [10, 20, 30, 255]).unwrap();
        assert_eq!(sharpen(&r, 0.0), r);
        assert_eq!(sharpen(&r, f32::NAN), r);
    }

    #[test]
    fn test_sharpen_single_pixel() {
        // Only the center tap is in bounds: response = 5 * 20 = 100
        let r = Raster::from_rgba(1, 1, vec![20, 0, 40, 255]).unwrap();
        let out = sharpen(&r, 1.0);
        assert_eq!(out.get_rgba(0, 0), Some([30, 0, 60, 255]));
    }

    #[test]
    fn test_sharpen_right_tap_ignored() {
        // A bright pixel to the right does not affect the left pixel
        let dark_bright = Raster::from_rgba(2, 1, vec![10, 10, 10, 255, 250, 250, 250, 0]).unwrap();
        let dark_dark = Raster::from_rgba(2, 1, vec![10, 10, 10, 255, 0, 0, 0, 0]).unwrap();
        assert_eq!(
            sharpen(&dark_bright, 5.0).get_rgba(0, 0),
            sharpen(&dark_dark, 5.0).get_rgba(0, 0)
        );
    }
}
