//! Despeckle: removal of small opaque clusters
//!
//! Every 4-connected opaque component with fewer pixels than the minimum
//! cluster size is made fully transparent. RGB is left as is.

use crate::conncomp::find_opaque_components;
use cutmatte_core::color::{ALPHA, ALPHA_TRANSPARENT};
use cutmatte_core::{BYTES_PER_PIXEL, Raster};

/// Counts gathered by one despeckle run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DespeckleStats {
    /// Opaque components found
    pub components: usize,
    /// Components removed for being too small
    pub removed_components: usize,
    /// Pixels made transparent
    pub removed_pixels: usize,
}

/// Remove opaque clusters smaller than `min_cluster_size`.
pub fn despeckle(raster: &Raster, min_cluster_size: u32) -> Raster {
    despeckle_with_stats(raster, min_cluster_size).0
}

/// Like [`despeckle`], also reporting what was removed.
///
/// `min_cluster_size <= 1` cannot remove anything and returns the input
/// with default (zero) stats, without labeling.
pub fn despeckle_with_stats(raster: &Raster, min_cluster_size: u32) -> (Raster, DespeckleStats) {
    if raster.is_empty() || min_cluster_size <= 1 {
        return (raster.clone(), DespeckleStats::default());
    }

    let components = find_opaque_components(raster);
    let mut stats = DespeckleStats {
        components: components.len(),
        ..Default::default()
    };

    let min = min_cluster_size as usize;
    let mut small = components.iter().filter(|c| c.size() < min).peekable();
    if small.peek().is_none() {
        return (raster.clone(), stats);
    }

    let mut out = raster.to_mut();
    let data = out.data_mut();
    for component in small {
        stats.removed_components += 1;
        stats.removed_pixels += component.size();
        for &i in &component.pixels {
            data[i * BYTES_PER_PIXEL + ALPHA] = ALPHA_TRANSPARENT;
        }
    }
    (out.into(), stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pixel_island() {
        let mut m = Raster::new(5, 5).unwrap().to_mut();
        m.set_rgba(2, 2, [9, 9, 9, 255]).unwrap();
        let r: Raster = m.into();

        let (out, stats) = despeckle_with_stats(&r, 2);
        assert_eq!(out.opaque_count(), 0);
        assert_eq!(out.get_rgba(2, 2), Some([9, 9, 9, 0]));
        assert_eq!(
            stats,
            DespeckleStats {
                components: 1,
                removed_components: 1,
                removed_pixels: 1,
            }
        );
    }

    #[test]
    fn test_two_pixel_island_kept() {
        let mut m = Raster::new(5, 5).unwrap().to_mut();
        m.set_rgba(2, 2, [9, 9, 9, 255]).unwrap();
        m.set_rgba(3, 2, [9, 9, 9, 255]).unwrap();
        let r: Raster = m.into();
        assert_eq!(despeckle(&r, 2), r);
    }

    #[test]
    fn test_min_one_is_identity() {
        let mut m = Raster::new(3, 3).unwrap().to_mut();
        m.set_rgba(0, 0, [0, 0, 0, 255]).unwrap();
        let r: Raster = m.into();
        assert_eq!(despeckle(&r, 0), r);
        assert_eq!(despeckle(&r, 1), r);
    }
}
