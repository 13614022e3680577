//! Image enhancement operations
//!
//! Tone reproduction curve (TRC) mapping for global contrast, the
//! spatially adaptive "text highlight" contrast boost, and RGB inversion.
//!
//! # Contrast curve
//!
//! A contrast factor `c` (1.0 = unchanged) is mapped to the classic
//! slope `259·(C+255) / (255·(259−C))` with `C = (c − 1)·255` clamped to
//! `[−255, 255]`, and applied around mid-gray:
//! `v' = clamp(slope·(v − 128) + 128, 0, 255)`. Alpha is never touched.

use cutmatte_core::color::{ALPHA, clamp_channel, is_opaque, pixel_luminance};
use cutmatte_core::{BYTES_PER_PIXEL, Raster, RasterMut};

/// A 256-entry lookup table for tone reproduction curve mapping.
pub type TrcLut = [u8; 256];

/// Luminance variance above which a 3x3 window counts as an edge.
pub const TEXT_HIGHLIGHT_VARIANCE: f32 = 20.0;

/// Slope of the contrast curve for factor `c`.
///
/// Non-finite factors are treated as 1.0.
pub fn contrast_slope(c: f32) -> f32 {
    let c = if c.is_finite() { c } else { 1.0 };
    let big_c = ((c - 1.0) * 255.0).clamp(-255.0, 255.0);
    259.0 * (big_c + 255.0) / (255.0 * (259.0 - big_c))
}

/// Generate the contrast TRC lookup table for factor `c`.
pub fn contrast_trc(c: f32) -> TrcLut {
    let slope = contrast_slope(c);
    let mut lut = [0u8; 256];
    for (i, entry) in lut.iter_mut().enumerate() {
        *entry = clamp_channel(slope * (i as f32 - 128.0) + 128.0);
    }
    lut
}

/// True if the table maps every value to itself.
pub fn is_identity_trc(lut: &TrcLut) -> bool {
    lut.iter().enumerate().all(|(i, &v)| i == v as usize)
}

/// Apply a TRC lookup table to R, G and B in-place.
pub fn trc_map(raster: &mut RasterMut, lut: &TrcLut) {
    for px in raster.data_mut().chunks_exact_mut(BYTES_PER_PIXEL) {
        px[0] = lut[px[0] as usize];
        px[1] = lut[px[1] as usize];
        px[2] = lut[px[2] as usize];
    }
}

/// Global contrast adjustment.
///
/// Returns the input unchanged (shared) when the curve is the identity,
/// which includes `c = 1.0`.
pub fn adjust_contrast(raster: &Raster, c: f32) -> Raster {
    let lut = contrast_trc(c);
    if raster.is_empty() || is_identity_trc(&lut) {
        return raster.clone();
    }
    let mut out = raster.to_mut();
    trc_map(&mut out, &lut);
    out.into()
}

/// Spatially adaptive contrast boost.
///
/// For each opaque pixel, the population variance of luminance over its
/// 3x3 window (clipped at the image edge) is measured on the input. Where
/// it exceeds [`TEXT_HIGHLIGHT_VARIANCE`], the contrast curve with factor
/// `1 + intensity/10` is applied to that pixel's RGB.
///
/// `intensity <= 0` (or non-finite) returns the input unchanged.
pub fn text_highlight(raster: &Raster, intensity: f32) -> Raster {
    if raster.is_empty() || !(intensity.is_finite() && intensity > 0.0) {
        return raster.clone();
    }
    let lut = contrast_trc(1.0 + intensity / 10.0);
    if is_identity_trc(&lut) {
        return raster.clone();
    }

    let w = raster.width() as usize;
    let h = raster.height() as usize;
    let src = raster.data();
    let lum: Vec<f32> = src
        .chunks_exact(BYTES_PER_PIXEL)
        .map(pixel_luminance)
        .collect();

    let mut out = raster.to_mut();
    let dst = out.data_mut();
    for y in 0..h {
        let y0 = y.saturating_sub(1);
        let y1 = (y + 1).min(h - 1);
        for x in 0..w {
            let i = (y * w + x) * BYTES_PER_PIXEL;
            if !is_opaque(src[i + ALPHA]) {
                continue;
            }
            let x0 = x.saturating_sub(1);
            let x1 = (x + 1).min(w - 1);

            let mut sum = 0.0f32;
            let mut n = 0.0f32;
            for yy in y0..=y1 {
                for xx in x0..=x1 {
                    sum += lum[yy * w + xx];
                    n += 1.0;
                }
            }
            let mean = sum / n;
            let mut var = 0.0f32;
            for yy in y0..=y1 {
                for xx in x0..=x1 {
                    let d = lum[yy * w + xx] - mean;
                    var += d * d;
                }
            }
            var /= n;

            if var > TEXT_HIGHLIGHT_VARIANCE {
                for c in 0..3 {
                    dst[i + c] = lut[src[i + c] as usize];
                }
            }
        }
    }
    out.into()
}

/// Invert R, G and B of every pixel. Alpha is untouched.
pub fn invert(raster: &Raster) -> Raster {
    if raster.is_empty() {
        return raster.clone();
    }
    let mut out = raster.to_mut();
    for px in out.data_mut().chunks_exact_mut(BYTES_PER_PIXEL) {
        px[0] = 255 - px[0];
        px[1] = 255 - px[1];
        px[2] = 255 - px[2];
    }
    out.into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contrast_identity_at_one() {
        assert_eq!(contrast_slope(1.0), 1.0);
        assert!(is_identity_trc(&contrast_trc(1.0)));
        assert!(is_identity_trc(&contrast_trc(f32::NAN)));
    }

    #[test]
    fn test_contrast_trc_monotone_and_centered() {
        for c in [0.5f32, 0.8, 1.3, 2.0, 2.5] {
            let lut = contrast_trc(c);
            assert!(lut.windows(2).all(|p| p[0] <= p[1]), "c = {c}");
            assert_eq!(lut[128], 128, "c = {c}");
        }
    }

    #[test]
    fn test_contrast_stretches_and_flattens() {
        let high = contrast_trc(2.0);
        assert_eq!(high[0], 0);
        assert_eq!(high[255], 255);
        assert!(high[100] < 100);
        assert!(high[160] > 160);

        let low = contrast_trc(0.5);
        assert!(low[0] > 0);
        assert!(low[255] < 255);
    }

    #[test]
    fn test_adjust_contrast_keeps_alpha() {
        let r = Raster::new_filled(2, 2, [60, 128, 200, 77]).unwrap();
        let out = adjust_contrast(&r, 2.0);
        for px in out.data().chunks_exact(4) {
            assert_eq!(px[3], 77);
            assert_eq!(px[1], 128);
            assert!(px[0] < 60);
            assert!(px[2] > 200);
        }
        let same = adjust_contrast(&r, 1.0);
        assert_eq!(same.data().as_ptr(), r.data().as_ptr());
    }

    #[test]
    fn test_invert_involution() {
        let r = Raster::from_rgba(2, 1, vec![0, 10, 255, 3, 128, 127, 1, 250]).unwrap();
        let once = invert(&r);
        assert_eq!(once.data(), &[255, 245, 0, 3, 127, 128, 254, 250]);
        assert_eq!(invert(&once), r);
    }

    #[test]
    fn test_text_highlight_flat_region_untouched() {
        let r = Raster::new_filled(5, 5, [90, 90, 90, 255]).unwrap();
        assert_eq!(text_highlight(&r, 10.0), r);
    }

    #[test]
    fn test_text_highlight_boosts_edges_only() {
        // Left half dark, right half light, all opaque; a far-away flat
        // column stays unchanged.
        let mut m = Raster::new(8, 3).unwrap().to_mut();
        for y in 0..3 {
            for x in 0..8 {
                let v = if x < 4 { 100 } else { 160 };
                m.set_rgba(x, y, [v, v, v, 255]).unwrap();
            }
        }
        let r: Raster = m.into();
        let out = text_highlight(&r, 10.0);
        // Pixels next to the boundary get pushed apart
        assert!(out.get_rgba_unchecked(3, 1)[0] < 100);
        assert!(out.get_rgba_unchecked(4, 1)[0] > 160);
        // Flat pixels far from the boundary are unchanged
        assert_eq!(out.get_rgba_unchecked(0, 1), [100, 100, 100, 255]);
        assert_eq!(out.get_rgba_unchecked(7, 1), [160, 160, 160, 255]);
    }

    #[test]
    fn test_text_highlight_skips_transparent() {
        let mut m = Raster::new(3, 1).unwrap().to_mut();
        m.set_rgba(0, 0, [0, 0, 0, 0]).unwrap();
        m.set_rgba(1, 0, [100, 100, 100, 0]).unwrap();
        m.set_rgba(2, 0, [255, 255, 255, 0]).unwrap();
        let r: Raster = m.into();
        assert_eq!(text_highlight(&r, 10.0), r);
    }
}
