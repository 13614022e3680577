//! Bilateral-style filtering (edge-preserving smoothing)
//!
//! Each output pixel is a weighted average of its neighborhood where the
//! weight depends only on color distance to the center pixel:
//!
//! ```text
//! w(d) = exp(-d / (strength * 30))
//! d    = |dR| + |dG| + |dB|        (0..=765)
//! ```
//!
//! The window radius is `ceil(strength / 2)` and is clipped at the image
//! edge. Uniform regions are averaged while pixels across a strong edge
//! contribute almost nothing, so edges survive. Alpha is untouched.
//!
//! # Example
//!
//! ```
//! use cutmatte_core::Raster;
//! use cutmatte_filter::bilateral_denoise;
//!
//! let raster = Raster::new_filled(8, 8, [200, 200, 200, 255]).unwrap();
//! let smoothed = bilateral_denoise(&raster, 4);
//! assert_eq!(smoothed, raster);
//! ```

use crate::{FilterError, FilterResult};
use cutmatte_core::color::clamp_channel;
use cutmatte_core::{BYTES_PER_PIXEL, Raster};

/// Largest possible sum of absolute RGB differences.
pub const MAX_COLOR_DISTANCE: usize = 3 * 255;

/// Create the range kernel for a given strength.
///
/// Returns [`MAX_COLOR_DISTANCE`] + 1 weights, where index `d` is the
/// weight for color distance `d`.
///
/// # Errors
///
/// Returns [`FilterError::InvalidParameters`] when `strength` is 0.
pub fn make_range_kernel(strength: u32) -> FilterResult<Vec<f32>> {
    if strength == 0 {
        return Err(FilterError::InvalidParameters(
            "denoise strength must be positive".to_string(),
        ));
    }
    let scale = strength as f32 * 30.0;
    Ok((0..=MAX_COLOR_DISTANCE)
        .map(|d| (-(d as f32) / scale).exp())
        .collect())
}

/// Window radius used for a given strength.
#[inline]
pub fn denoise_radius(strength: u32) -> u32 {
    strength.div_ceil(2)
}

/// Edge-preserving smoothing of R, G and B.
///
/// `strength = 0` returns the input unchanged.
pub fn bilateral_denoise(raster: &Raster, strength: u32) -> Raster {
    if raster.is_empty() {
        return raster.clone();
    }
    let Ok(range) = make_range_kernel(strength) else {
        return raster.clone();
    };

    let w = raster.width() as usize;
    let h = raster.height() as usize;
    let r = denoise_radius(strength) as usize;
    let src = raster.data();
    let mut out = raster.to_mut();
    let dst = out.data_mut();

    for y in 0..h {
        let y0 = y.saturating_sub(r);
        let y1 = (y + r).min(h - 1);
        for x in 0..w {
            let x0 = x.saturating_sub(r);
            let x1 = (x + r).min(w - 1);
            let ci = (y * w + x) * BYTES_PER_PIXEL;
            let center = [src[ci] as i32, src[ci + 1] as i32, src[ci + 2] as i32];

            let mut acc = [0.0f32; 3];
            let mut total = 0.0f32;
            for yy in y0..=y1 {
                let row = yy * w;
                for xx in x0..=x1 {
                    let ni = (row + xx) * BYTES_PER_PIXEL;
                    let d = (src[ni] as i32 - center[0]).unsigned_abs()
                        + (src[ni + 1] as i32 - center[1]).unsigned_abs()
                        + (src[ni + 2] as i32 - center[2]).unsigned_abs();
                    let weight = range[d as usize];
                    acc[0] += weight * src[ni] as f32;
                    acc[1] += weight * src[ni + 1] as f32;
                    acc[2] += weight * src[ni + 2] as f32;
                    total += weight;
                }
            }

            // The center always contributes weight 1
            for c in 0..3 {
                dst[ci + c] = clamp_channel(acc[c] / total);
            }
        }
    }
    out.into()
}
