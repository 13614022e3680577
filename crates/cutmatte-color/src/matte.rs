//! Alpha matting
//!
//! Derives the alpha channel from luminance `L = (R + G + B) / 3` using one
//! of three policies selected by [`MattingMethod`]:
//!
//! | Policy | Rule |
//! |--------|------|
//! | BlendIf | `L < min` cut; `min <= L < max` alpha capped by a 0..255 ramp |
//! | ColorRange | `L < threshold` cut |
//! | Channels | levels remap, then binarize at 128 into kept black or cut white |
//!
//! BlendIf and ColorRange cut the dark side and keep light pixels.
//! Channels keeps the dark side as solid black instead.

use cutmatte_core::color::{ALPHA, ALPHA_OPAQUE, ALPHA_TRANSPARENT, clamp_channel, pixel_luminance};
use cutmatte_core::{BYTES_PER_PIXEL, MattingMethod, Raster};

/// Binarization level for the channels policy.
const CHANNELS_SPLIT: f32 = 128.0;

/// Apply the selected matting policy.
pub fn apply_matting(raster: &Raster, method: &MattingMethod) -> Raster {
    if raster.is_empty() {
        return raster.clone();
    }
    match *method {
        MattingMethod::BlendIf { min, max } => blend_if(raster, min, max),
        MattingMethod::ColorRange { threshold } => color_range(raster, threshold),
        MattingMethod::Channels {
            black_point,
            white_point,
        } => channels(raster, black_point, white_point),
    }
}

/// Blend-if matting.
///
/// Pixels darker than `min` are cut. Pixels in `[min, max)` keep at most
/// a linearly ramped alpha. Brighter pixels are unchanged. When
/// `max <= min` the ramp band is empty.
pub fn blend_if(raster: &Raster, min: u8, max: u8) -> Raster {
    let lo = min as f32;
    let hi = max as f32;
    map_pixels(raster, |px| {
        let l = pixel_luminance(px);
        if l < lo {
            px[ALPHA] = ALPHA_TRANSPARENT;
        } else if l < hi {
            let ramp = clamp_channel((l - lo) / (hi - lo) * 255.0);
            px[ALPHA] = px[ALPHA].min(ramp);
        }
    })
}

/// Hard luminance threshold. Pixels darker than `threshold` are cut.
///
/// `threshold = 0` cuts nothing.
pub fn color_range(raster: &Raster, threshold: u8) -> Raster {
    if threshold == 0 {
        return raster.clone();
    }
    let t = threshold as f32;
    map_pixels(raster, |px| {
        if pixel_luminance(px) < t {
            px[ALPHA] = ALPHA_TRANSPARENT;
        }
    })
}

/// Levels remap and binarize.
///
/// Dark results become opaque black, light results become transparent
/// white. When `white_point <= black_point` the divisor is 1.
pub fn channels(raster: &Raster, black_point: u8, white_point: u8) -> Raster {
    let black = black_point as f32;
    let span = if white_point > black_point {
        white_point as f32 - black
    } else {
        1.0
    };
    map_pixels(raster, |px| {
        let adjusted = ((pixel_luminance(px) - black) / span * 255.0).clamp(0.0, 255.0);
        if adjusted < CHANNELS_SPLIT {
            px[..3].fill(0);
            px[ALPHA] = ALPHA_OPAQUE;
        } else {
            px[..3].fill(255);
            px[ALPHA] = ALPHA_TRANSPARENT;
        }
    })
}

fn map_pixels(raster: &Raster, f: impl Fn(&mut [u8])) -> Raster {
    let mut out = raster.to_mut();
    for px in out.data_mut().chunks_exact_mut(BYTES_PER_PIXEL) {
        f(px);
    }
    out.into()
}
