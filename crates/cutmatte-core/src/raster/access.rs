//! Pixel access functions
//!
//! Checked and unchecked getters and setters for individual pixels.
//! Stages that sweep the whole image work on [`Raster::data`] directly
//! and use [`pixel_offset`] for neighbor lookups.

use super::{BYTES_PER_PIXEL, Raster, RasterMut};
use crate::color::{ALPHA, is_opaque};
use crate::error::{Error, Result};

/// Byte offset of pixel `(x, y)` in a raster of the given width.
#[inline]
pub fn pixel_offset(width: u32, x: u32, y: u32) -> usize {
    (y as usize * width as usize + x as usize) * BYTES_PER_PIXEL
}

impl Raster {
    /// Get RGBA values at (x, y).
    ///
    /// Returns `None` if coordinates are out of bounds.
    pub fn get_rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.get_rgba_unchecked(x, y))
    }

    /// Get RGBA values without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if the offset falls outside the buffer.
    #[inline]
    pub fn get_rgba_unchecked(&self, x: u32, y: u32) -> [u8; 4] {
        let i = pixel_offset(self.width(), x, y);
        let d = self.data();
        [d[i], d[i + 1], d[i + 2], d[i + 3]]
    }

    /// Get the alpha value at (x, y) without bounds checking.
    #[inline]
    pub fn alpha_unchecked(&self, x: u32, y: u32) -> u8 {
        self.data()[pixel_offset(self.width(), x, y) + ALPHA]
    }

    /// Count pixels whose alpha is at least the opacity threshold.
    pub fn opaque_count(&self) -> usize {
        self.data()
            .chunks_exact(BYTES_PER_PIXEL)
            .filter(|px| is_opaque(px[ALPHA]))
            .count()
    }
}

impl RasterMut {
    /// Get RGBA values at (x, y).
    pub fn get_rgba(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = pixel_offset(self.width(), x, y);
        let d = self.data();
        Some([d[i], d[i + 1], d[i + 2], d[i + 3]])
    }

    /// Set an RGBA pixel at (x, y).
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if coordinates are out of bounds.
    pub fn set_rgba(&mut self, x: u32, y: u32, rgba: [u8; 4]) -> Result<()> {
        if x >= self.width() || y >= self.height() {
            return Err(Error::OutOfBounds {
                x,
                y,
                width: self.width(),
                height: self.height(),
            });
        }
        self.set_rgba_unchecked(x, y, rgba);
        Ok(())
    }

    /// Set an RGBA pixel without bounds checking.
    ///
    /// # Panics
    ///
    /// Panics if the offset falls outside the buffer.
    #[inline]
    pub fn set_rgba_unchecked(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        let i = pixel_offset(self.width(), x, y);
        self.data_mut()[i..i + BYTES_PER_PIXEL].copy_from_slice(&rgba);
    }
}
