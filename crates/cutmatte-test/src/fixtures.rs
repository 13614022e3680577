//! Synthetic test images
//!
//! Every fixture is generated in memory, so the regression tests need no
//! binary test data.

use cutmatte_core::Raster;

/// Opaque black used for "ink" pixels.
pub const INK: [u8; 4] = [0, 0, 0, 255];
/// Opaque white.
pub const WHITE: [u8; 4] = [255, 255, 255, 255];
/// Fully transparent black.
pub const CLEAR: [u8; 4] = [0, 0, 0, 0];

/// Build a raster from a per-pixel function.
pub fn from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> Raster {
    let mut data = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        for x in 0..width {
            data.extend_from_slice(&f(x, y));
        }
    }
    Raster::from_rgba(width, height, data).expect("fixture size is consistent")
}

/// Every pixel set to `rgba`.
pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Raster {
    Raster::new_filled(width, height, rgba).expect("fixture size is valid")
}

/// Axis-aligned rectangle `(x, y, w, h)`.
pub type Rect = (u32, u32, u32, u32);

fn in_rect(x: u32, y: u32, r: &Rect) -> bool {
    x >= r.0 && x < r.0 + r.2 && y >= r.1 && y < r.1 + r.3
}

/// Opaque ink rectangles on a transparent background.
pub fn blobs_on_clear(width: u32, height: u32, rects: &[Rect]) -> Raster {
    from_fn(width, height, |x, y| {
        if rects.iter().any(|r| in_rect(x, y, r)) {
            INK
        } else {
            CLEAR
        }
    })
}

/// Opaque ink rectangles on an opaque white background.
pub fn ink_on_white(width: u32, height: u32, rects: &[Rect]) -> Raster {
    from_fn(width, height, |x, y| {
        if rects.iter().any(|r| in_rect(x, y, r)) {
            INK
        } else {
            WHITE
        }
    })
}

/// Opaque horizontal gray ramp from 0 at the left edge to 255 at the right.
pub fn gradient(width: u32, height: u32) -> Raster {
    let span = width.saturating_sub(1).max(1) as f32;
    from_fn(width, height, |x, _| {
        let v = (x as f32 * 255.0 / span).round() as u8;
        [v, v, v, 255]
    })
}

/// Opaque color pattern that varies in every channel.
pub fn color_pattern(width: u32, height: u32) -> Raster {
    from_fn(width, height, |x, y| {
        [
            (x * 37 + y * 11) as u8,
            (x * 5 + y * 53) as u8,
            (x * y + 91) as u8,
            255,
        ]
    })
}

/// Ink rectangles on white with deterministic salt-and-pepper noise.
///
/// Roughly one pixel in `1 / density` is flipped to pure black or white.
pub fn noisy_logo(width: u32, height: u32, rects: &[Rect], density: f32, seed: u64) -> Raster {
    let mut state = seed.wrapping_mul(0x9e37_79b9_7f4a_7c15) | 1;
    let threshold = (density.clamp(0.0, 1.0) * u32::MAX as f32) as u32;
    let base = ink_on_white(width, height, rects);
    let mut m = base.to_mut();
    for y in 0..height {
        for x in 0..width {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let r = (state >> 32) as u32;
            if r < threshold {
                let v = if r & 1 == 0 { INK } else { WHITE };
                m.set_rgba_unchecked(x, y, v);
            }
        }
    }
    m.into()
}
