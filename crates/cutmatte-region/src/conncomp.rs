//! Connected component analysis
//!
//! Finds connected sets of opaque pixels (alpha >= 128) with an iterative
//! flood fill. The fill uses an explicit stack, so component size is
//! bounded by memory only and never by call depth.

use cutmatte_core::color::{ALPHA, is_opaque};
use cutmatte_core::{BYTES_PER_PIXEL, Raster};

/// A connected set of opaque pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectedComponent {
    /// Pixel indices (`y * width + x`) in discovery order
    pub pixels: Vec<usize>,
}

impl ConnectedComponent {
    /// Number of pixels in this component
    pub fn size(&self) -> usize {
        self.pixels.len()
    }
}

/// Find the 4-connected components of opaque pixels.
///
/// Diagonal contact does not join components. Components are returned in
/// row-major order of their first pixel.
pub fn find_opaque_components(raster: &Raster) -> Vec<ConnectedComponent> {
    if raster.is_empty() {
        return Vec::new();
    }
    let w = raster.width() as usize;
    let h = raster.height() as usize;
    let data = raster.data();
    let opaque = |i: usize| is_opaque(data[i * BYTES_PER_PIXEL + ALPHA]);

    let mut visited = vec![false; w * h];
    let mut stack = Vec::new();
    let mut components = Vec::new();

    for start in 0..w * h {
        if visited[start] || !opaque(start) {
            continue;
        }
        visited[start] = true;
        stack.push(start);
        let mut pixels = Vec::new();

        while let Some(i) = stack.pop() {
            pixels.push(i);
            let x = i % w;
            let y = i / w;

            let mut visit = |nx: usize, ny: usize| {
                let n = ny * w + nx;
                if !visited[n] && opaque(n) {
                    visited[n] = true;
                    stack.push(n);
                }
            };

            if x > 0 {
                visit(x - 1, y);
            }
            if x + 1 < w {
                visit(x + 1, y);
            }
            if y > 0 {
                visit(x, y - 1);
            }
            if y + 1 < h {
                visit(x, y + 1);
            }
        }
        components.push(ConnectedComponent { pixels });
    }
    components
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mask(w: u32, h: u32, on: &[(u32, u32)]) -> Raster {
        let mut m = Raster::new(w, h).unwrap().to_mut();
        for &(x, y) in on {
            m.set_rgba(x, y, [0, 0, 0, 255]).unwrap();
        }
        m.into()
    }

    #[test]
    fn test_diagonal_pixels() {
        let r = mask(3, 3, &[(0, 0), (1, 1), (2, 2)]);
        let comps = find_opaque_components(&r);
        assert_eq!(comps.len(), 3);
        assert!(comps.iter().all(|c| c.size() == 1));
    }

    #[test]
    fn test_plus_shape_is_one_component() {
        let r = mask(3, 3, &[(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)]);
        let comps = find_opaque_components(&r);
        assert_eq!(comps.len(), 1);
        let mut pixels = comps[0].pixels.clone();
        pixels.sort_unstable();
        assert_eq!(pixels, vec![1, 3, 4, 5, 7]);
    }

    #[test]
    fn test_component_sizes_and_order() {
        let r = mask(5, 3, &[(4, 0), (0, 1), (1, 1), (1, 2)]);
        let comps = find_opaque_components(&r);
        assert_eq!(comps.len(), 2);
        assert_eq!(comps[0].size(), 1);
        assert_eq!(comps[0].pixels, vec![4]);
        assert_eq!(comps[1].size(), 3);
    }

    #[test]
    fn test_semi_transparent_threshold() {
        let mut m = Raster::new(2, 1).unwrap().to_mut();
        m.set_rgba(0, 0, [0, 0, 0, 128]).unwrap();
        m.set_rgba(1, 0, [0, 0, 0, 127]).unwrap();
        let comps = find_opaque_components(&m.into());
        assert_eq!(comps.len(), 1);
        assert_eq!(comps[0].pixels, vec![0]);
    }

    #[test]
    fn test_empty() {
        assert!(find_opaque_components(&Raster::new(0, 4).unwrap()).is_empty());
        assert!(find_opaque_components(&Raster::new(4, 4).unwrap()).is_empty());
    }
}
