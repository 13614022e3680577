//! cutmatte-io - Image decoding and encoding
//!
//! Converts compressed image bytes to and from [`Raster`]:
//!
//! - Decoding: PNG, JPEG, GIF, BMP, WebP (per feature flag). Formats
//!   without alpha decode as fully opaque.
//! - Encoding: lossless RGBA only (PNG, WebP), because transparency marks
//!   the region to cut away.
//! - Load-time downscaling of oversized uploads ([`DecodeOptions`]).

#[cfg(feature = "bmp")]
pub mod bmp;
mod error;
pub mod format;
#[cfg(feature = "gif-format")]
pub mod gif;
#[cfg(feature = "jpeg")]
pub mod jpeg;
#[cfg(feature = "png-format")]
pub mod png;
#[cfg(feature = "webp-format")]
pub mod webp;

pub use error::{IoError, IoResult};
pub use format::{ImageFormat, detect_format, detect_format_from_bytes};

use cutmatte_core::Raster;
use std::fs::File;
use std::io::{BufWriter, Cursor};
use std::path::Path;

/// Conventional file name for the processed result.
pub const DEFAULT_OUTPUT_NAME: &str = "cleaned.png";

/// Longest side an upload may keep before it is downscaled.
pub const DEFAULT_MAX_DIMENSION: u32 = 1600;

/// Lossless, alpha-capable output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// 8-bit RGBA PNG
    #[default]
    Png,
    /// Lossless RGBA WebP
    WebpLossless,
}

impl OutputFormat {
    /// Get the file extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::WebpLossless => "webp",
        }
    }
}

/// Options applied while decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Downscale so the longer side is at most this many pixels
    pub max_dimension: Option<u32>,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            max_dimension: Some(DEFAULT_MAX_DIMENSION),
        }
    }
}

impl DecodeOptions {
    /// Decode at the original size.
    pub fn original_size() -> Self {
        Self {
            max_dimension: None,
        }
    }
}

/// Decode image bytes at their original size.
///
/// # Errors
///
/// Returns an [`IoError`] if the format is unknown, its support is not
/// enabled, or the data is corrupt.
pub fn decode(data: &[u8]) -> IoResult<Raster> {
    decode_with_options(data, &DecodeOptions::original_size())
}

/// Decode image bytes and apply [`DecodeOptions`].
pub fn decode_with_options(data: &[u8], options: &DecodeOptions) -> IoResult<Raster> {
    let format = detect_format_from_bytes(data)?;
    if format.is_lossy() {
        tracing::warn!(
            format = %format,
            "lossy input; compression artifacts may cause rough cut edges"
        );
    }

    let raster = decode_format(data, format)?;
    tracing::debug!(
        format = %format,
        width = raster.width(),
        height = raster.height(),
        "decoded image"
    );

    match options.max_dimension {
        Some(max) if raster.width().max(raster.height()) > max => {
            let scaled = cutmatte_transform::scale_to_fit(&raster, max)?;
            tracing::info!(
                from_width = raster.width(),
                from_height = raster.height(),
                width = scaled.width(),
                height = scaled.height(),
                "downscaled oversized image"
            );
            Ok(scaled)
        }
        _ => Ok(raster),
    }
}

#[allow(unused_variables)]
fn decode_format(data: &[u8], format: ImageFormat) -> IoResult<Raster> {
    match format {
        #[cfg(feature = "png-format")]
        ImageFormat::Png => png::read_png(Cursor::new(data)),
        #[cfg(feature = "jpeg")]
        ImageFormat::Jpeg => jpeg::read_jpeg(data),
        #[cfg(feature = "gif-format")]
        ImageFormat::Gif => gif::read_gif(data),
        #[cfg(feature = "bmp")]
        ImageFormat::Bmp => bmp::read_bmp(data),
        #[cfg(feature = "webp-format")]
        ImageFormat::WebP => webp::read_webp(Cursor::new(data)),
        #[allow(unreachable_patterns)]
        other => Err(IoError::UnsupportedFormat(format!(
            "{} support not enabled",
            other
        ))),
    }
}

/// Encode a raster in a lossless, alpha-capable format.
#[allow(unused_variables)]
pub fn encode(raster: &Raster, format: OutputFormat) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    match format {
        #[cfg(feature = "png-format")]
        OutputFormat::Png => png::write_png(raster, &mut out)?,
        #[cfg(feature = "webp-format")]
        OutputFormat::WebpLossless => webp::write_webp(raster, &mut out)?,
        #[allow(unreachable_patterns)]
        other => {
            return Err(IoError::UnsupportedFormat(format!(
                "{:?} output support not enabled",
                other
            )));
        }
    }
    Ok(out)
}

/// Read and decode an image file at its original size.
pub fn read_image<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    read_image_with_options(path, &DecodeOptions::original_size())
}

/// Read and decode an image file, applying [`DecodeOptions`].
pub fn read_image_with_options<P: AsRef<Path>>(
    path: P,
    options: &DecodeOptions,
) -> IoResult<Raster> {
    let data = std::fs::read(path)?;
    decode_with_options(&data, options)
}

/// Encode a raster and write it to a file.
pub fn write_image<P: AsRef<Path>>(raster: &Raster, path: P, format: OutputFormat) -> IoResult<()> {
    let bytes = encode(raster, format)?;
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    std::io::Write::write_all(&mut writer, &bytes)?;
    std::io::Write::flush(&mut writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_extension() {
        assert_eq!(OutputFormat::Png.extension(), "png");
        assert_eq!(OutputFormat::WebpLossless.extension(), "webp");
        assert!(DEFAULT_OUTPUT_NAME.ends_with(OutputFormat::default().extension()));
    }

    #[test]
    fn test_default_decode_options() {
        assert_eq!(DecodeOptions::default().max_dimension, Some(1600));
        assert_eq!(DecodeOptions::original_size().max_dimension, None);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(decode(b"not an image at all").is_err());
        assert!(decode(b"").is_err());
    }

    #[cfg(feature = "png-format")]
    #[test]
    fn test_decode_downscales() {
        let raster = Raster::new_filled(40, 10, [1, 2, 3, 255]).unwrap();
        let bytes = encode(&raster, OutputFormat::Png).unwrap();
        let options = DecodeOptions {
            max_dimension: Some(20),
        };
        let small = decode_with_options(&bytes, &options).unwrap();
        assert_eq!((small.width(), small.height()), (20, 5));
        let full = decode(&bytes).unwrap();
        assert_eq!(full, raster);
    }
}
