//! cutmatte - Logo matting for heat-transfer-vinyl cutting
//!
//! Turns an uploaded logo into an alpha-matted silhouette ready for a
//! cutting machine. The work is a fixed chain of pure raster stages:
//!
//! - Tonal adjustment and denoising ([`filter`])
//! - Matting: luminance to alpha ([`color`])
//! - Erosion and dilation of the alpha channel ([`morph`])
//! - Despeckle of small opaque clusters ([`region`])
//! - Edge refinement: alpha blur, sharpen, local contrast ([`filter`])
//!
//! [`run_pipeline`] runs the chain once. [`PreviewSession`] runs it on a
//! worker thread for interactive tuning, with debounce, cancellation and
//! reuse of unchanged early stages.
//!
//! # Example
//!
//! ```
//! use cutmatte::{MattingMethod, PipelineParams, Raster, run_pipeline};
//!
//! let white = Raster::new_filled(4, 4, [255, 255, 255, 255]).unwrap();
//! let params = PipelineParams {
//!     matting: MattingMethod::ColorRange { threshold: 200 },
//!     ..PipelineParams::default()
//! };
//! let out = run_pipeline(&white, &params);
//! assert_eq!(out.opaque_count(), 16);
//! ```

mod error;
pub mod pipeline;
pub mod session;

// Re-export core types (primary data structures used everywhere)
pub use cutmatte_core::{
    BYTES_PER_PIXEL, Error, MattingMethod, PipelineParams, Raster, RasterMut, Result, buffer_len,
    limits, params, raster,
};

// Re-export domain crates as modules to avoid name conflicts
pub use cutmatte_color as color;
pub use cutmatte_filter as filter;
pub use cutmatte_io as io;
pub use cutmatte_morph as morph;
pub use cutmatte_region as region;
pub use cutmatte_transform as transform;

pub use error::{PipelineError, PipelineResult};
pub use pipeline::{
    CancelToken, Cancelled, Stage, StageCache, run_pipeline, run_pipeline_cancellable,
};
pub use session::{PreviewResult, PreviewSession, SessionConfig};

use cutmatte_io::{DecodeOptions, OutputFormat};

/// Decode image bytes, run the pipeline and encode the result.
///
/// # Errors
///
/// Returns [`PipelineError::Io`] if decoding or encoding fails. No stage
/// runs on undecodable input.
pub fn process_image(
    data: &[u8],
    params: &PipelineParams,
    options: &DecodeOptions,
    format: OutputFormat,
) -> PipelineResult<Vec<u8>> {
    let source = cutmatte_io::decode_with_options(data, options)?;
    let out = run_pipeline(&source, params);
    Ok(cutmatte_io::encode(&out, format)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_reexports() {
        let params = PipelineParams {
            contrast: 9.0,
            ..PipelineParams::default()
        };
        let err: Error = params.validate().unwrap_err();
        assert!(matches!(
            err,
            Error::ParameterOutOfRange {
                name: "contrast",
                ..
            }
        ));

        // `color` is the matting crate, not the core channel helpers
        let white = Raster::new_filled(2, 2, [255, 255, 255, 255]).unwrap();
        let cut = color::apply_matting(&white, &MattingMethod::ColorRange { threshold: 200 });
        assert_eq!(cut.opaque_count(), 4);
        assert_eq!(raster::buffer_len(2, 2).unwrap(), 16);
    }
}
