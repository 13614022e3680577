//! Rank filtering operations
//!
//! A 3x3 median filter applied independently to R, G and B. Border pixels
//! have an incomplete window and are copied unchanged. Alpha is never
//! touched.

use cutmatte_core::{BYTES_PER_PIXEL, Raster};

/// Apply a 3x3 per-channel median filter.
///
/// Rasters narrower or shorter than 3 pixels have no interior and are
/// returned unchanged.
pub fn median_filter(raster: &Raster) -> Raster {
    let w = raster.width() as usize;
    let h = raster.height() as usize;
    if w < 3 || h < 3 {
        return raster.clone();
    }

    let src = raster.data();
    let mut out = raster.to_mut();
    let dst = out.data_mut();
    let mut window = [0u8; 9];

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = (y * w + x) * BYTES_PER_PIXEL;
            for c in 0..3 {
                let mut k = 0;
                for yy in y - 1..=y + 1 {
                    for xx in x - 1..=x + 1 {
                        window[k] = src[(yy * w + xx) * BYTES_PER_PIXEL + c];
                        k += 1;
                    }
                }
                window.sort_unstable();
                dst[i + c] = window[4];
            }
        }
    }
    out.into()
}
