//! BMP image format support
//!
//! Reads uncompressed Windows Bitmap (BMP) files at 1, 4, 8, 24 and 32 bpp.
//! Palettes are expanded to RGB. The fourth byte of 32-bpp pixels is
//! used as alpha unless every pixel leaves it zero, in which case the
//! image is treated as opaque.

use crate::{IoError, IoResult};
use cutmatte_core::Raster;
use std::io::Read;

/// BMP file header size
const BMP_FILE_HEADER_SIZE: usize = 14;

/// BMP info header size (BITMAPINFOHEADER)
const BMP_INFO_HEADER_SIZE: u32 = 40;

fn le_u16(b: &[u8]) -> u16 {
    u16::from_le_bytes([b[0], b[1]])
}

fn le_u32(b: &[u8]) -> u32 {
    u32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

fn le_i32(b: &[u8]) -> i32 {
    i32::from_le_bytes([b[0], b[1], b[2], b[3]])
}

/// Read a BMP image
pub fn read_bmp<R: Read>(mut reader: R) -> IoResult<Raster> {
    let mut file_header = [0u8; BMP_FILE_HEADER_SIZE];
    reader.read_exact(&mut file_header).map_err(IoError::Io)?;

    if &file_header[0..2] != b"BM" {
        return Err(IoError::InvalidData("not a BMP file".to_string()));
    }

    let pixel_offset = le_u32(&file_header[10..]) as usize;

    let mut info_header = [0u8; 40];
    reader.read_exact(&mut info_header).map_err(IoError::Io)?;

    let header_size = le_u32(&info_header[0..]);
    if header_size < BMP_INFO_HEADER_SIZE {
        return Err(IoError::InvalidData(format!(
            "unsupported BMP header size: {}",
            header_size
        )));
    }

    let width = le_i32(&info_header[4..]);
    let height = le_i32(&info_header[8..]);

    let planes = le_u16(&info_header[12..]);
    if planes != 1 {
        return Err(IoError::InvalidData(format!(
            "unsupported number of planes: {}",
            planes
        )));
    }

    let bits_per_pixel = le_u16(&info_header[14..]);
    let compression = le_u32(&info_header[16..]);

    // Uncompressed or BI_BITFIELDS with the standard masks only
    if compression != 0 && compression != 3 {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP compression: {}",
            compression
        )));
    }

    if !matches!(bits_per_pixel, 1 | 4 | 8 | 24 | 32) {
        return Err(IoError::UnsupportedFormat(format!(
            "unsupported BMP bit depth: {}",
            bits_per_pixel
        )));
    }

    let width = width.unsigned_abs();
    let top_down = height < 0;
    let height = height.unsigned_abs();

    // Skip the rest of an extended info header
    let extra_header = header_size as usize - BMP_INFO_HEADER_SIZE as usize;
    if extra_header > 0 {
        let mut skip = vec![0u8; extra_header];
        reader.read_exact(&mut skip).map_err(IoError::Io)?;
    }

    // Palette as RGB triples, for 1, 4 and 8 bit images
    let palette: Vec<[u8; 3]> = if bits_per_pixel <= 8 {
        let num_colors = 1usize << bits_per_pixel;
        let mut raw = vec![0u8; num_colors * 4];
        reader.read_exact(&mut raw).map_err(IoError::Io)?;
        raw.chunks_exact(4).map(|c| [c[2], c[1], c[0]]).collect()
    } else {
        Vec::new()
    };

    let current_pos = BMP_FILE_HEADER_SIZE + header_size as usize + palette.len() * 4;
    if pixel_offset > current_pos {
        let mut skip = vec![0u8; pixel_offset - current_pos];
        reader.read_exact(&mut skip).map_err(IoError::Io)?;
    }

    let mut out = Raster::new(width, height)?.to_mut();

    // BMP rows are 4-byte aligned
    let row_stride = (width as usize * bits_per_pixel as usize).div_ceil(32) * 4;
    let mut row_buffer = vec![0u8; row_stride];
    let mut any_alpha = false;

    let lookup = |index: u8| -> [u8; 4] {
        let [r, g, b] = palette.get(index as usize).copied().unwrap_or([0, 0, 0]);
        [r, g, b, 255]
    };

    for row in 0..height {
        reader.read_exact(&mut row_buffer).map_err(IoError::Io)?;

        let y = if top_down { row } else { height - 1 - row };

        for x in 0..width {
            let xi = x as usize;
            let rgba = match bits_per_pixel {
                1 => lookup((row_buffer[xi / 8] >> (7 - (xi % 8))) & 1),
                4 => {
                    let byte = row_buffer[xi / 2];
                    lookup(if xi % 2 == 0 { byte >> 4 } else { byte & 0xF })
                }
                8 => lookup(row_buffer[xi]),
                24 => {
                    let i = xi * 3;
                    [row_buffer[i + 2], row_buffer[i + 1], row_buffer[i], 255]
                }
                _ => {
                    let i = xi * 4;
                    let a = row_buffer[i + 3];
                    any_alpha |= a != 0;
                    [row_buffer[i + 2], row_buffer[i + 1], row_buffer[i], a]
                }
            };
            out.set_rgba_unchecked(x, y, rgba);
        }
    }

    if bits_per_pixel == 32 && !any_alpha {
        for px in out.data_mut().chunks_exact_mut(4) {
            px[3] = 255;
        }
    }

    Ok(out.into())
}
