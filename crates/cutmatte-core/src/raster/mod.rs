//! Raster - The RGBA8 image container
//!
//! # Pixel layout
//!
//! - Four bytes per pixel in R, G, B, A order
//! - Rows are stored top to bottom with no padding
//! - Pixel `(x, y)` starts at byte `(y * width + x) * 4`
//!
//! # Ownership model
//!
//! `Raster` uses `Arc` for cheap cloning (shared ownership).
//! To modify pixel data, copy into a `RasterMut` with [`Raster::to_mut`],
//! then convert back with `Into<Raster>`.
//!
//! A raster with zero width or height is valid and holds no bytes.
//! Every processing stage treats it as a no-op.

mod access;

use crate::error::{Error, Result};
use std::sync::Arc;

/// Bytes per RGBA pixel.
pub const BYTES_PER_PIXEL: usize = 4;

/// Internal raster data
#[derive(Debug, PartialEq, Eq)]
struct RasterData {
    /// Width in pixels
    width: u32,
    /// Height in pixels
    height: u32,
    /// RGBA bytes, row-major
    data: Vec<u8>,
}

impl RasterData {
    fn zeroed(width: u32, height: u32) -> Result<Self> {
        let len = buffer_len(width, height)?;
        Ok(RasterData {
            width,
            height,
            data: vec![0u8; len],
        })
    }
}

/// Compute the byte length of a `width x height` RGBA buffer.
///
/// # Errors
///
/// Returns [`Error::InvalidDimension`] if the length overflows `usize`.
pub fn buffer_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(BYTES_PER_PIXEL))
        .ok_or(Error::InvalidDimension { width, height })
}

/// Raster - Main image container
///
/// # Examples
///
/// ```
/// use cutmatte_core::Raster;
///
/// let raster = Raster::new_filled(4, 3, [255, 255, 255, 255]).unwrap();
/// assert_eq!(raster.width(), 4);
/// assert_eq!(raster.height(), 3);
/// assert_eq!(raster.data().len(), 4 * 3 * 4);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    inner: Arc<RasterData>,
}

impl Raster {
    /// Create a new raster with every byte set to zero (transparent black).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDimension`] if the buffer size overflows.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Raster {
            inner: Arc::new(RasterData::zeroed(width, height)?),
        })
    }

    /// Create a new raster with every pixel set to `rgba`.
    pub fn new_filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let mut inner = RasterData::zeroed(width, height)?;
        for px in inner.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
        Ok(Raster {
            inner: Arc::new(inner),
        })
    }

    /// Wrap an existing RGBA buffer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferSizeMismatch`] if `data.len()` is not
    /// `width * height * 4`.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = buffer_len(width, height)?;
        if data.len() != expected {
            return Err(Error::BufferSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Raster {
            inner: Arc::new(RasterData {
                width,
                height,
                data,
            }),
        })
    }

    /// Get the image width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// Number of pixels (`width * height`).
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.inner.width as usize * self.inner.height as usize
    }

    /// True if the raster has zero width or height.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.width == 0 || self.inner.height == 0
    }

    /// Get raw access to the RGBA bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Check if two rasters have the same width and height.
    pub fn sizes_equal(&self, other: &Raster) -> bool {
        self.inner.width == other.inner.width && self.inner.height == other.inner.height
    }

    /// Create a mutable copy of this raster.
    ///
    /// Always creates a new copy that can be modified.
    pub fn to_mut(&self) -> RasterMut {
        RasterMut {
            inner: RasterData {
                width: self.inner.width,
                height: self.inner.height,
                data: self.inner.data.clone(),
            },
        }
    }
}

/// Mutable raster
///
/// Allows modification of image data. Convert back to an immutable
/// [`Raster`] using `Into<Raster>`.
#[derive(Debug)]
pub struct RasterMut {
    inner: RasterData,
}

impl RasterMut {
    /// Get the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Get the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    /// True if the raster has zero width or height.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.width == 0 || self.inner.height == 0
    }

    /// Get raw access to the RGBA bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.inner.data
    }

    /// Get mutable access to the RGBA bytes.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.inner.data
    }

    /// Set every pixel to `rgba`.
    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.inner.data.chunks_exact_mut(BYTES_PER_PIXEL) {
            px.copy_from_slice(&rgba);
        }
    }
}

impl From<RasterMut> for Raster {
    fn from(raster_mut: RasterMut) -> Self {
        Raster {
            inner: Arc::new(raster_mut.inner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_creation() {
        let raster = Raster::new(100, 200).unwrap();
        assert_eq!(raster.width(), 100);
        assert_eq!(raster.height(), 200);
        assert_eq!(raster.data().len(), 100 * 200 * 4);
        assert!(raster.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_raster_empty_allowed() {
        let raster = Raster::new(0, 10).unwrap();
        assert!(raster.is_empty());
        assert!(raster.data().is_empty());
        assert_eq!(raster.pixel_count(), 0);
    }

    #[test]
    fn test_raster_from_rgba_size_check() {
        assert!(Raster::from_rgba(2, 2, vec![0; 16]).is_ok());
        let err = Raster::from_rgba(2, 2, vec![0; 15]).unwrap_err();
        assert_eq!(
            err,
            Error::BufferSizeMismatch {
                expected: 16,
                actual: 15
            }
        );
    }

    #[test]
    fn test_raster_clone_shares_data() {
        let r1 = Raster::new(10, 10).unwrap();
        let r2 = r1.clone();
        assert_eq!(r1.data().as_ptr(), r2.data().as_ptr());
    }

    #[test]
    fn test_to_mut_copies() {
        let r1 = Raster::new(4, 4).unwrap();
        let mut m = r1.to_mut();
        m.fill([1, 2, 3, 4]);
        let r2: Raster = m.into();
        assert_ne!(r1.data().as_ptr(), r2.data().as_ptr());
        assert_eq!(&r2.data()[..4], &[1, 2, 3, 4]);
        assert!(r1.data().iter().all(|&b| b == 0));
    }
}
