//! Image scaling operations
//!
//! Only downscaling is needed: oversized uploads are shrunk to fit a
//! maximum dimension before the pipeline runs. The reduction is an area
//! map (box-weighted average), which anti-aliases edges.

use crate::TransformResult;
use cutmatte_core::color::{ALPHA, clamp_channel};
use cutmatte_core::{BYTES_PER_PIXEL, Raster};

/// Dimensions that fit `width x height` within `max_dimension`.
///
/// The longer side becomes `max_dimension`; the other side keeps the
/// aspect ratio, rounded to nearest and at least 1. Returns the input
/// dimensions when they already fit.
pub fn fit_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if max_dimension == 0 || longest <= max_dimension {
        return (width, height);
    }
    let ratio = longest as f64 / max_dimension as f64;
    let w = ((width as f64 / ratio).round() as u32).max(1);
    let h = ((height as f64 / ratio).round() as u32).max(1);
    (w, h)
}

/// Shrink `raster` so its longer side is at most `max_dimension`.
///
/// Returns a clone of the input (shared data) when no scaling is needed.
///
/// # Errors
///
/// Returns [`crate::TransformError::Core`] if the output raster cannot be
/// allocated.
pub fn scale_to_fit(raster: &Raster, max_dimension: u32) -> TransformResult<Raster> {
    let (w, h) = fit_dimensions(raster.width(), raster.height(), max_dimension);
    if w == raster.width() && h == raster.height() {
        return Ok(raster.clone());
    }
    Ok(scale_area_map(raster, w, h)?)
}

/// Per-axis contributions: for each destination index, the source
/// indices it covers and the fraction of each covered.
fn axis_weights(src: u32, dst: u32) -> Vec<Vec<(u32, f32)>> {
    let step = src as f64 / dst as f64;
    (0..dst)
        .map(|d| {
            let start = d as f64 * step;
            let end = (start + step).min(src as f64);
            let mut spans = Vec::new();
            let mut s = start.floor() as u32;
            while (s as f64) < end && s < src {
                let lo = start.max(s as f64);
                let hi = end.min(s as f64 + 1.0);
                if hi > lo {
                    spans.push((s, (hi - lo) as f32));
                }
                s += 1;
            }
            spans
        })
        .collect()
}

/// Box-weighted average. Color is weighted by alpha so transparent
/// pixels do not darken the edges of opaque regions.
fn scale_area_map(raster: &Raster, width: u32, height: u32) -> cutmatte_core::Result<Raster> {
    let xw = axis_weights(raster.width(), width);
    let yw = axis_weights(raster.height(), height);
    let src = raster.data();
    let sw = raster.width() as usize;

    let mut out = Raster::new(width, height)?.to_mut();
    let dst = out.data_mut();
    for (y, ys) in yw.iter().enumerate() {
        for (x, xs) in xw.iter().enumerate() {
            let mut area = 0.0f32;
            let mut a_sum = 0.0f32;
            let mut rgb_sum = [0.0f32; 3];
            for &(sy, wy) in ys {
                for &(sx, wx) in xs {
                    let w = wx * wy;
                    let i = (sy as usize * sw + sx as usize) * BYTES_PER_PIXEL;
                    let a = src[i + ALPHA] as f32;
                    area += w;
                    a_sum += a * w;
                    for c in 0..3 {
                        rgb_sum[c] += src[i + c] as f32 * a * w;
                    }
                }
            }
            let o = (y * width as usize + x) * BYTES_PER_PIXEL;
            if area > 0.0 && a_sum > 0.0 {
                for c in 0..3 {
                    dst[o + c] = clamp_channel(rgb_sum[c] / a_sum);
                }
                dst[o + 3] = clamp_channel(a_sum / area);
            }
        }
    }
    Ok(out.into())
}
