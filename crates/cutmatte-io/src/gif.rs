//! GIF image format support
//!
//! Reads the first frame of a GIF onto its logical screen. The decoder
//! expands the palette to RGBA, so the frame's transparent index becomes
//! alpha 0. Screen area not covered by the frame is transparent.

use crate::{IoError, IoResult};
use cutmatte_core::Raster;
use gif::{ColorOutput, DecodeOptions};
use std::io::Read;

/// Read a GIF image
///
/// Animated GIFs are accepted; only the first frame is used.
pub fn read_gif<R: Read>(reader: R) -> IoResult<Raster> {
    let mut options = DecodeOptions::new();
    options.set_color_output(ColorOutput::RGBA);

    let mut decoder = options
        .read_info(reader)
        .map_err(|e| IoError::DecodeError(format!("GIF decode error: {}", e)))?;

    let screen_w = decoder.width() as u32;
    let screen_h = decoder.height() as u32;

    let frame = decoder
        .read_next_frame()
        .map_err(|e| IoError::DecodeError(format!("GIF frame error: {}", e)))?
        .ok_or_else(|| IoError::InvalidData("no frames in GIF".to_string()))?;

    // Some encoders write a zero-size screen; fall back to the frame.
    let (width, height) = if screen_w == 0 || screen_h == 0 {
        (frame.width as u32, frame.height as u32)
    } else {
        (screen_w, screen_h)
    };
    let left = frame.left as u32;
    let top = frame.top as u32;
    let fw = frame.width as u32;
    let fh = frame.height as u32;
    if frame.buffer.len() < fw as usize * fh as usize * 4 {
        return Err(IoError::InvalidData(format!(
            "GIF frame buffer too small for {}x{}",
            fw, fh
        )));
    }

    let mut out = Raster::new(width, height)?.to_mut();
    for fy in 0..fh {
        let y = top + fy;
        if y >= height {
            break;
        }
        for fx in 0..fw {
            let x = left + fx;
            if x >= width {
                break;
            }
            let i = (fy as usize * fw as usize + fx as usize) * 4;
            let px = &frame.buffer[i..i + 4];
            out.set_rgba_unchecked(x, y, [px[0], px[1], px[2], px[3]]);
        }
    }

    if decoder.read_next_frame().ok().flatten().is_some() {
        tracing::debug!("animated GIF, using first frame only");
    }

    Ok(out.into())
}
