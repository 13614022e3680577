//! JPEG image format support
//!
//! Reads JPEG images using the `jpeg-decoder` crate. JPEG carries no alpha,
//! so every decoded pixel is opaque. Writing is not supported: the
//! pipeline only emits lossless, alpha-capable output.

use crate::{IoError, IoResult};
use cutmatte_core::Raster;
use jpeg_decoder::{Decoder, PixelFormat};
use std::io::Read;

/// Read a JPEG image from a reader.
///
/// Grayscale (8 or 16 bit) and RGB images are supported; CMYK is
/// rejected.
pub fn read_jpeg<R: Read>(reader: R) -> IoResult<Raster> {
    let mut decoder = Decoder::new(reader);
    let pixels = decoder
        .decode()
        .map_err(|e| IoError::DecodeError(format!("JPEG decode error: {}", e)))?;
    let info = decoder
        .info()
        .ok_or_else(|| IoError::DecodeError("JPEG has no image info".to_string()))?;

    let width = info.width as u32;
    let height = info.height as u32;
    let npix = width as usize * height as usize;

    let mut out = Vec::with_capacity(cutmatte_core::buffer_len(width, height)?);
    match info.pixel_format {
        PixelFormat::L8 => {
            for &g in pixels.iter().take(npix) {
                out.extend_from_slice(&[g, g, g, 255]);
            }
        }
        PixelFormat::L16 => {
            // Big-endian samples, keep the high byte
            for s in pixels.chunks_exact(2).take(npix) {
                out.extend_from_slice(&[s[0], s[0], s[0], 255]);
            }
        }
        PixelFormat::RGB24 => {
            for s in pixels.chunks_exact(3).take(npix) {
                out.extend_from_slice(&[s[0], s[1], s[2], 255]);
            }
        }
        PixelFormat::CMYK32 => {
            return Err(IoError::UnsupportedFormat(
                "CMYK JPEG not supported".to_string(),
            ));
        }
    }

    if out.len() != npix * 4 {
        return Err(IoError::InvalidData(format!(
            "JPEG pixel data truncated: {} of {} pixels",
            out.len() / 4,
            npix
        )));
    }

    Ok(Raster::from_rgba(width, height, out)?)
}
