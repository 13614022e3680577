//! Convolution operations
//!
//! - Alpha box blur through a summed-area table (block convolution)
//! - Kernel convolution restricted to the RGB of opaque pixels

use crate::Kernel;
use cutmatte_core::color::{ALPHA, clamp_channel, is_opaque};
use cutmatte_core::{BYTES_PER_PIXEL, Raster};

/// Summed-area table of the alpha channel.
///
/// The table has `(w + 1) * (h + 1)` entries with a zero first row and
/// column, so `acc[(y+1)*(w+1) + (x+1)]` is the alpha sum of the rectangle
/// `(0,0)..=(x,y)`.
pub fn alpha_accum(raster: &Raster) -> Vec<u64> {
    let w = raster.width() as usize;
    let h = raster.height() as usize;
    let stride = w + 1;
    let data = raster.data();
    let mut acc = vec![0u64; stride * (h + 1)];

    for y in 0..h {
        let mut row_sum = 0u64;
        for x in 0..w {
            row_sum += data[(y * w + x) * BYTES_PER_PIXEL + ALPHA] as u64;
            acc[(y + 1) * stride + x + 1] = acc[y * stride + x + 1] + row_sum;
        }
    }
    acc
}

/// Box blur of the alpha channel.
///
/// Each alpha becomes the rounded mean over the `(2r+1)²` window clipped
/// to the image. RGB is untouched. `radius = 0` returns the input.
pub fn blur_alpha(raster: &Raster, radius: u32) -> Raster {
    if raster.is_empty() || radius == 0 {
        return raster.clone();
    }

    let w = raster.width() as usize;
    let h = raster.height() as usize;
    let r = radius as usize;
    let stride = w + 1;
    let acc = alpha_accum(raster);

    let mut out = raster.to_mut();
    let dst = out.data_mut();
    for y in 0..h {
        let y0 = y.saturating_sub(r);
        let y1 = (y + r).min(h - 1) + 1;
        for x in 0..w {
            let x0 = x.saturating_sub(r);
            let x1 = (x + r).min(w - 1) + 1;
            let sum = acc[y1 * stride + x1] + acc[y0 * stride + x0]
                - acc[y0 * stride + x1]
                - acc[y1 * stride + x0];
            let count = ((y1 - y0) * (x1 - x0)) as u64;
            dst[(y * w + x) * BYTES_PER_PIXEL + ALPHA] = ((sum + count / 2) / count) as u8;
        }
    }
    out.into()
}

/// Convolve R, G and B of opaque pixels and add the response to the
/// original value.
///
/// `channel' = clamp(orig + response * weight)`. Taps falling outside the
/// image are skipped. Neighbors are read from the input regardless of
/// their alpha. Transparent pixels and all alpha values are untouched.
pub fn convolve_opaque_rgb(raster: &Raster, kernel: &Kernel, weight: f32) -> Raster {
    if raster.is_empty() || weight == 0.0 || !weight.is_finite() {
        return raster.clone();
    }

    let w = raster.width() as i64;
    let h = raster.height() as i64;
    let cx = kernel.center_x() as i64;
    let cy = kernel.center_y() as i64;
    let src = raster.data();
    let mut out = raster.to_mut();
    let dst = out.data_mut();

    for y in 0..h {
        for x in 0..w {
            let i = (y * w + x) as usize * BYTES_PER_PIXEL;
            if !is_opaque(src[i + ALPHA]) {
                continue;
            }
            let mut response = [0.0f32; 3];
            for ky in 0..kernel.height() {
                let sy = y + ky as i64 - cy;
                if sy < 0 || sy >= h {
                    continue;
                }
                for kx in 0..kernel.width() {
                    let sx = x + kx as i64 - cx;
                    if sx < 0 || sx >= w {
                        continue;
                    }
                    let tap = kernel.data()[(ky * kernel.width() + kx) as usize];
                    if tap == 0.0 {
                        continue;
                    }
                    let si = (sy * w + sx) as usize * BYTES_PER_PIXEL;
                    for c in 0..3 {
                        response[c] += tap * src[si + c] as f32;
                    }
                }
            }
            for c in 0..3 {
                dst[i + c] = clamp_channel(src[i + c] as f32 + response[c] * weight);
            }
        }
    }
    out.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_accum() {
        let r = Raster::from_rgba(2, 2, vec![0, 0, 0, 1, 0, 0, 0, 2, 0, 0, 0, 3, 0, 0, 0, 4])
            .unwrap();
        let acc = alpha_accum(&r);
        assert_eq!(acc.len(), 9);
        assert_eq!(acc[4], 1);
        assert_eq!(acc[5], 3);
        assert_eq!(acc[7], 4);
        assert_eq!(acc[8], 10);
    }

    #[test]
    fn test_blur_radius_zero_identity() {
        let r = Raster::new_filled(3, 3, [1, 2, 3, 4]).unwrap();
        assert_eq!(blur_alpha(&r, 0), r);
    }

    #[test]
    fn test_blur_clips_window_at_edges() {
        // Single row: alpha 0, 255, 0
        let r = Raster::from_rgba(3, 1, vec![9, 9, 9, 0, 9, 9, 9, 255, 9, 9, 9, 0]).unwrap();
        let out = blur_alpha(&r, 1);
        // Corner window holds 2 pixels, center window holds 3
        assert_eq!(out.alpha_unchecked(0, 0), 128);
        assert_eq!(out.alpha_unchecked(1, 0), 85);
        assert_eq!(out.alpha_unchecked(2, 0), 128);
        assert_eq!(out.get_rgba_unchecked(1, 0)[..3], [9, 9, 9]);
    }

    #[test]
    fn test_blur_uniform_alpha_unchanged() {
        let r = Raster::new_filled(6, 4, [0, 0, 0, 200]).unwrap();
        assert_eq!(blur_alpha(&r, 3), r);
    }

    #[test]
    fn test_convolve_skips_transparent() {
        let r = Raster::new_filled(3, 3, [50, 50, 50, 0]).unwrap();
        assert_eq!(convolve_opaque_rgb(&r, &Kernel::sharpen(), 1.0), r);
    }
}
