//! Alpha-channel erosion and dilation
//!
//! Both operations use the 8-connected 3x3 neighborhood and run in passes.
//! Every pass reads a frozen snapshot of the previous pass and writes a
//! fresh buffer, so pixels changed early in a pass never influence later
//! pixels of the same pass. Neighbors outside the image are ignored.

use cutmatte_core::color::{ALPHA, ALPHA_OPAQUE, ALPHA_TRANSPARENT, is_opaque};
use cutmatte_core::{BYTES_PER_PIXEL, Raster};

/// Neighbor offsets `(dx, dy)` in row-major scan order.
pub const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Byte offsets of the in-bounds 8-neighbors of `(x, y)`, in scan order.
fn neighbor_offsets(
    w: usize,
    h: usize,
    x: usize,
    y: usize,
) -> impl Iterator<Item = usize> {
    NEIGHBORS_8.iter().filter_map(move |&(dx, dy)| {
        let nx = x.checked_add_signed(dx as isize)?;
        let ny = y.checked_add_signed(dy as isize)?;
        (nx < w && ny < h).then_some((ny * w + nx) * BYTES_PER_PIXEL)
    })
}

/// Shrink the opaque region.
///
/// Per pass, every pixel that has an in-bounds neighbor with alpha below
/// the opacity threshold gets alpha 0. `passes = 0` returns the input.
pub fn erode_alpha(raster: &Raster, passes: u32) -> Raster {
    run_passes(raster, passes, |src, dst, w, h| {
        let mut changed = false;
        for y in 0..h {
            for x in 0..w {
                let i = (y * w + x) * BYTES_PER_PIXEL + ALPHA;
                if src[i] == ALPHA_TRANSPARENT {
                    continue;
                }
                if neighbor_offsets(w, h, x, y).any(|n| !is_opaque(src[n + ALPHA])) {
                    dst[i] = ALPHA_TRANSPARENT;
                    changed = true;
                }
            }
        }
        changed
    })
}

/// Grow the opaque region.
///
/// Per pass, every non-opaque pixel with an in-bounds opaque neighbor
/// takes the RGB of the first such neighbor in scan order and gets
/// alpha 255. `passes = 0` returns the input.
pub fn dilate_alpha(raster: &Raster, passes: u32) -> Raster {
    run_passes(raster, passes, |src, dst, w, h| {
        let mut changed = false;
        for y in 0..h {
            for x in 0..w {
                let i = (y * w + x) * BYTES_PER_PIXEL;
                if is_opaque(src[i + ALPHA]) {
                    continue;
                }
                if let Some(n) = neighbor_offsets(w, h, x, y).find(|&n| is_opaque(src[n + ALPHA])) {
                    dst[i..i + 3].copy_from_slice(&src[n..n + 3]);
                    dst[i + ALPHA] = ALPHA_OPAQUE;
                    changed = true;
                }
            }
        }
        changed
    })
}

/// Drive `pass` up to `passes` times, double-buffered.
///
/// Stops early once a pass changes nothing, since every later pass would
/// see the same snapshot.
fn run_passes(
    raster: &Raster,
    passes: u32,
    pass: impl Fn(&[u8], &mut [u8], usize, usize) -> bool,
) -> Raster {
    if raster.is_empty() || passes == 0 {
        return raster.clone();
    }
    let w = raster.width() as usize;
    let h = raster.height() as usize;

    let mut current = raster.clone();
    for _ in 0..passes {
        let mut next = current.to_mut();
        if !pass(current.data(), next.data_mut(), w, h) {
            break;
        }
        current = next.into();
    }
    current
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(w: u32, h: u32, x0: u32, y0: u32, size: u32) -> Raster {
        let mut m = Raster::new(w, h).unwrap().to_mut();
        for y in y0..y0 + size {
            for x in x0..x0 + size {
                m.set_rgba(x, y, [10, 20, 30, 255]).unwrap();
            }
        }
        m.into()
    }

    #[test]
    fn test_neighbor_offsets_clip() {
        assert_eq!(neighbor_offsets(3, 3, 0, 0).count(), 3);
        assert_eq!(neighbor_offsets(3, 3, 1, 0).count(), 5);
        assert_eq!(neighbor_offsets(3, 3, 1, 1).count(), 8);
        assert_eq!(neighbor_offsets(1, 1, 0, 0).count(), 0);
    }

    #[test]
    fn test_erode_square() {
        let r = square(7, 7, 1, 1, 5);
        let e = erode_alpha(&r, 1);
        assert_eq!(e.opaque_count(), 9);
        assert_eq!(erode_alpha(&r, 2).opaque_count(), 1);
        assert_eq!(erode_alpha(&r, 3).opaque_count(), 0);
    }

    #[test]
    fn test_erode_ignores_out_of_bounds() {
        let r = Raster::new_filled(4, 4, [0, 0, 0, 255]).unwrap();
        assert_eq!(erode_alpha(&r, 5), r);
    }

    #[test]
    fn test_dilate_copies_neighbor_rgb() {
        let mut m = Raster::new(3, 3).unwrap().to_mut();
        m.set_rgba(1, 1, [7, 8, 9, 200]).unwrap();
        let r: Raster = m.into();
        let d = dilate_alpha(&r, 1);
        assert_eq!(d.opaque_count(), 9);
        assert_eq!(d.get_rgba(0, 0), Some([7, 8, 9, 255]));
        // Already opaque pixel keeps its own alpha
        assert_eq!(d.get_rgba(1, 1), Some([7, 8, 9, 200]));
    }

    #[test]
    fn test_dilate_first_neighbor_in_scan_order() {
        let mut m = Raster::new(3, 1).unwrap().to_mut();
        m.set_rgba(0, 0, [1, 1, 1, 255]).unwrap();
        m.set_rgba(2, 0, [2, 2, 2, 255]).unwrap();
        let r: Raster = m.into();
        assert_eq!(dilate_alpha(&r, 1).get_rgba(1, 0), Some([1, 1, 1, 255]));
    }

    #[test]
    fn test_zero_passes() {
        let r = square(5, 5, 1, 1, 3);
        assert_eq!(erode_alpha(&r, 0), r);
        assert_eq!(dilate_alpha(&r, 0), r);
    }
}
