//! PNG image format support
//!
//! Every PNG color type is decoded to RGBA8. Palettes and `tRNS`
//! transparency are expanded by the decoder; 16-bit samples keep their
//! high byte. Output is always 8-bit RGBA so transparency survives.

use crate::{IoError, IoResult};
use cutmatte_core::Raster;
use png::{BitDepth, ColorType, Decoder, Encoder, Transformations};
use std::io::{BufRead, Seek, Write};

/// Read a PNG image
pub fn read_png<R: BufRead + Seek>(reader: R) -> IoResult<Raster> {
    let mut decoder = Decoder::new(reader);
    decoder.set_transformations(Transformations::EXPAND);
    let mut reader = decoder
        .read_info()
        .map_err(|e| IoError::DecodeError(format!("PNG decode error: {}", e)))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("failed to get output buffer size".to_string()))?;
    let mut buf = vec![0; buf_size];
    let output_info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::DecodeError(format!("PNG frame error: {}", e)))?;

    let width = output_info.width;
    let height = output_info.height;
    let bytes_per_row = output_info.line_size;
    let data = &buf[..output_info.buffer_size()];

    // Bytes per sample after expansion: 1 or 2
    let bps = match output_info.bit_depth {
        BitDepth::Eight => 1,
        BitDepth::Sixteen => 2,
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "unexpected PNG bit depth after expansion: {:?}",
                other
            )));
        }
    };
    let channels = match output_info.color_type {
        ColorType::Grayscale => 1,
        ColorType::GrayscaleAlpha => 2,
        ColorType::Rgb => 3,
        ColorType::Rgba => 4,
        ColorType::Indexed => {
            return Err(IoError::UnsupportedFormat(
                "PNG palette was not expanded".to_string(),
            ));
        }
    };

    let mut out = Vec::with_capacity(cutmatte_core::buffer_len(width, height)?);
    for y in 0..height as usize {
        let row = &data[y * bytes_per_row..];
        for x in 0..width as usize {
            let px = &row[x * channels * bps..];
            // High byte of sample `c`
            let s = |c: usize| px[c * bps];
            let rgba = match channels {
                1 => [s(0), s(0), s(0), 255],
                2 => [s(0), s(0), s(0), s(1)],
                3 => [s(0), s(1), s(2), 255],
                _ => [s(0), s(1), s(2), s(3)],
            };
            out.extend_from_slice(&rgba);
        }
    }

    Ok(Raster::from_rgba(width, height, out)?)
}

/// Write a PNG image as 8-bit RGBA
pub fn write_png<W: Write>(raster: &Raster, writer: W) -> IoResult<()> {
    if raster.is_empty() {
        return Err(IoError::EncodeError(format!(
            "cannot encode empty {}x{} image as PNG",
            raster.width(),
            raster.height()
        )));
    }

    let mut encoder = Encoder::new(writer, raster.width(), raster.height());
    encoder.set_color(ColorType::Rgba);
    encoder.set_depth(BitDepth::Eight);

    let mut writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(format!("PNG header error: {}", e)))?;
    writer
        .write_image_data(raster.data())
        .map_err(|e| IoError::EncodeError(format!("PNG write error: {}", e)))?;
    writer
        .finish()
        .map_err(|e| IoError::EncodeError(format!("PNG finish error: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encode_raw(width: u32, height: u32, color: ColorType, depth: BitDepth, data: &[u8]) -> Vec<u8> {
        let mut bytes = Vec::new();
        let mut encoder = Encoder::new(&mut bytes, width, height);
        encoder.set_color(color);
        encoder.set_depth(depth);
        let mut w = encoder.write_header().unwrap();
        w.write_image_data(data).unwrap();
        w.finish().unwrap();
        bytes
    }

    #[test]
    fn test_png_roundtrip_rgba() {
        let mut m = Raster::new(3, 2).unwrap().to_mut();
        m.set_rgba(0, 0, [255, 0, 0, 255]).unwrap();
        m.set_rgba(1, 0, [0, 255, 0, 128]).unwrap();
        m.set_rgba(2, 1, [0, 0, 255, 0]).unwrap();
        let raster: Raster = m.into();

        let mut bytes = Vec::new();
        write_png(&raster, &mut bytes).unwrap();
        let back = read_png(Cursor::new(bytes)).unwrap();
        assert_eq!(back, raster);
    }

    #[test]
    fn test_png_gray_gets_opaque_alpha() {
        let bytes = encode_raw(2, 1, ColorType::Grayscale, BitDepth::Eight, &[10, 200]);
        let r = read_png(Cursor::new(bytes)).unwrap();
        assert_eq!(r.get_rgba(0, 0), Some([10, 10, 10, 255]));
        assert_eq!(r.get_rgba(1, 0), Some([200, 200, 200, 255]));
    }

    #[test]
    fn test_png_16bit_rgb() {
        let data = [0x12, 0x34, 0xAB, 0xCD, 0xFF, 0x00];
        let bytes = encode_raw(1, 1, ColorType::Rgb, BitDepth::Sixteen, &data);
        let r = read_png(Cursor::new(bytes)).unwrap();
        assert_eq!(r.get_rgba(0, 0), Some([0x12, 0xAB, 0xFF, 255]));
    }

    #[test]
    fn test_png_corrupt() {
        let result = read_png(Cursor::new(b"\x89PNG\r\n\x1a\nbroken".to_vec()));
        assert!(matches!(result, Err(IoError::DecodeError(_))));
    }

    #[test]
    fn test_png_empty_rejected() {
        let r = Raster::new(0, 0).unwrap();
        assert!(write_png(&r, Vec::new()).is_err());
    }
}
