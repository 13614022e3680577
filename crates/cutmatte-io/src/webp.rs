//! WebP image format support
//!
//! Reads lossy and lossless still WebP images and writes lossless RGBA.
//! Animated WebP images are rejected.

use crate::{IoError, IoResult};
use cutmatte_core::Raster;
use image_webp::{ColorType, WebPDecoder, WebPEncoder};
use std::io::{BufRead, Seek, Write};

/// Read a WebP image
pub fn read_webp<R: BufRead + Seek>(reader: R) -> IoResult<Raster> {
    let mut decoder = WebPDecoder::new(reader)
        .map_err(|e| IoError::DecodeError(format!("WebP decode error: {}", e)))?;

    if decoder.is_animated() {
        return Err(IoError::UnsupportedFormat(
            "animated WebP not supported".to_string(),
        ));
    }

    let (width, height) = decoder.dimensions();
    let has_alpha = decoder.has_alpha();

    let buffer_size = decoder.output_buffer_size().ok_or_else(|| {
        IoError::DecodeError("failed to determine output buffer size".to_string())
    })?;
    let mut buffer = vec![0u8; buffer_size];
    decoder
        .read_image(&mut buffer)
        .map_err(|e| IoError::DecodeError(format!("WebP read error: {}", e)))?;

    let data = if has_alpha {
        buffer
    } else {
        let mut rgba = Vec::with_capacity(cutmatte_core::buffer_len(width, height)?);
        for px in buffer.chunks_exact(3) {
            rgba.extend_from_slice(&[px[0], px[1], px[2], 255]);
        }
        rgba
    };

    Ok(Raster::from_rgba(width, height, data)?)
}

/// Write a WebP image using lossless RGBA compression
pub fn write_webp<W: Write>(raster: &Raster, writer: W) -> IoResult<()> {
    if raster.is_empty() {
        return Err(IoError::EncodeError(format!(
            "cannot encode empty {}x{} image as WebP",
            raster.width(),
            raster.height()
        )));
    }

    let mut encoder = WebPEncoder::new(writer);

    // EncoderParams is non-exhaustive, so we use Default and modify
    let mut params = image_webp::EncoderParams::default();
    params.use_predictor_transform = true;
    encoder.set_params(params);

    encoder
        .encode(raster.data(), raster.width(), raster.height(), ColorType::Rgba8)
        .map_err(|e| IoError::EncodeError(format!("WebP encode error: {}", e)))?;

    Ok(())
}
