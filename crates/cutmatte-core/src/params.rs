//! Pipeline parameters
//!
//! [`PipelineParams`] carries every knob of the matting pipeline. Values
//! arrive from interactive controls, parameter files and command-line
//! flags, so the pipeline never trusts them: [`PipelineParams::clamped`]
//! forces every field into its valid range before a run, and
//! [`PipelineParams::validate`] reports the first out-of-range field for
//! callers that prefer to reject bad input.
//!
//! Eight-bit levels (matting thresholds) are stored as `u8` and are in
//! range by construction.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Valid ranges of the numeric pipeline parameters.
pub mod limits {
    use std::ops::RangeInclusive;

    pub const CONTRAST: RangeInclusive<f32> = 0.5..=2.5;
    pub const DENOISE_STRENGTH: RangeInclusive<u32> = 0..=10;
    pub const MORPH_PASSES: RangeInclusive<u32> = 0..=5;
    pub const MIN_CLUSTER_SIZE: RangeInclusive<u32> = 0..=500;
    pub const BLUR_RADIUS: RangeInclusive<u32> = 0..=10;
    pub const SHARPEN_INTENSITY: RangeInclusive<f32> = 0.0..=10.0;
    pub const TEXT_HIGHLIGHT_INTENSITY: RangeInclusive<f32> = 0.0..=10.0;
}

/// Alpha-generation policy. Exactly one runs per pipeline pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MattingMethod {
    /// Luminance ramp: below `min` is cut, `[min, max)` fades in.
    BlendIf { min: u8, max: u8 },
    /// Hard luminance threshold.
    ColorRange { threshold: u8 },
    /// Levels remap then binarize at mid-gray into black (kept) or
    /// white (cut).
    Channels { black_point: u8, white_point: u8 },
}

impl Default for MattingMethod {
    fn default() -> Self {
        MattingMethod::ColorRange { threshold: 200 }
    }
}

impl MattingMethod {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            MattingMethod::BlendIf { .. } => "blend-if",
            MattingMethod::ColorRange { .. } => "color-range",
            MattingMethod::Channels { .. } => "channels",
        }
    }
}

/// Complete parameter set for one pipeline run.
///
/// Missing fields in a parameter file take their [`Default`] values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    /// Active matting policy, written as a single-key map in every format
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub matting: MattingMethod,
    /// Global contrast factor, 1.0 = unchanged
    pub contrast: f32,
    /// Bilateral denoise strength, 0 = off
    pub denoise_strength: u32,
    /// Run the 3x3 median filter
    pub median_filter: bool,
    /// Alpha erosion passes
    pub erosion_passes: u32,
    /// Alpha dilation passes
    pub dilation_passes: u32,
    /// Opaque components smaller than this are removed
    pub min_cluster_size: u32,
    /// Alpha box blur radius
    pub blur_radius: u32,
    /// Sharpen strength, 0 = off
    pub sharpen_intensity: f32,
    /// Local contrast boost on edge-like regions, 0 = off
    pub text_highlight_intensity: f32,
    /// Invert RGB at the end of the run
    pub invert_colors: bool,
    /// Run the matting stage; when false the source alpha is kept
    pub remove_background: bool,
}

impl Default for PipelineParams {
    fn default() -> Self {
        PipelineParams {
            matting: MattingMethod::default(),
            contrast: 1.0,
            denoise_strength: 0,
            median_filter: false,
            erosion_passes: 0,
            dilation_passes: 0,
            min_cluster_size: 0,
            blur_radius: 0,
            sharpen_intensity: 0.0,
            text_highlight_intensity: 0.0,
            invert_colors: false,
            remove_background: true,
        }
    }
}

impl PipelineParams {
    /// Parameters under which every stage is an identity transform.
    ///
    /// Matting stays enabled with a zero threshold, which keeps every
    /// pixel's alpha.
    pub fn identity() -> Self {
        PipelineParams {
            matting: MattingMethod::ColorRange { threshold: 0 },
            ..PipelineParams::default()
        }
    }

    /// Return a copy with every field forced into its valid range.
    ///
    /// Non-finite floats fall back to their default value. Each adjusted
    /// field is logged at warn level.
    pub fn clamped(&self) -> Self {
        let defaults = PipelineParams::default();
        PipelineParams {
            matting: self.matting,
            contrast: clamp_f32("contrast", self.contrast, limits::CONTRAST, defaults.contrast),
            denoise_strength: clamp_u32(
                "denoise_strength",
                self.denoise_strength,
                limits::DENOISE_STRENGTH,
            ),
            median_filter: self.median_filter,
            erosion_passes: clamp_u32("erosion_passes", self.erosion_passes, limits::MORPH_PASSES),
            dilation_passes: clamp_u32(
                "dilation_passes",
                self.dilation_passes,
                limits::MORPH_PASSES,
            ),
            min_cluster_size: clamp_u32(
                "min_cluster_size",
                self.min_cluster_size,
                limits::MIN_CLUSTER_SIZE,
            ),
            blur_radius: clamp_u32("blur_radius", self.blur_radius, limits::BLUR_RADIUS),
            sharpen_intensity: clamp_f32(
                "sharpen_intensity",
                self.sharpen_intensity,
                limits::SHARPEN_INTENSITY,
                defaults.sharpen_intensity,
            ),
            text_highlight_intensity: clamp_f32(
                "text_highlight_intensity",
                self.text_highlight_intensity,
                limits::TEXT_HIGHLIGHT_INTENSITY,
                defaults.text_highlight_intensity,
            ),
            invert_colors: self.invert_colors,
            remove_background: self.remove_background,
        }
    }

    /// Check every field against its valid range.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ParameterOutOfRange`] for the first field outside
    /// its range (NaN is always out of range).
    pub fn validate(&self) -> Result<()> {
        check_f32("contrast", self.contrast, limits::CONTRAST)?;
        check_u32("denoise_strength", self.denoise_strength, limits::DENOISE_STRENGTH)?;
        check_u32("erosion_passes", self.erosion_passes, limits::MORPH_PASSES)?;
        check_u32("dilation_passes", self.dilation_passes, limits::MORPH_PASSES)?;
        check_u32("min_cluster_size", self.min_cluster_size, limits::MIN_CLUSTER_SIZE)?;
        check_u32("blur_radius", self.blur_radius, limits::BLUR_RADIUS)?;
        check_f32("sharpen_intensity", self.sharpen_intensity, limits::SHARPEN_INTENSITY)?;
        check_f32(
            "text_highlight_intensity",
            self.text_highlight_intensity,
            limits::TEXT_HIGHLIGHT_INTENSITY,
        )?;
        Ok(())
    }
}

fn clamp_f32(name: &'static str, value: f32, range: RangeInclusive<f32>, default: f32) -> f32 {
    if !value.is_finite() {
        tracing::warn!(param = name, value = %value, fallback = default, "non-finite parameter");
        return default;
    }
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        tracing::warn!(param = name, value, clamped, "parameter clamped");
    }
    clamped
}

fn clamp_u32(name: &'static str, value: u32, range: RangeInclusive<u32>) -> u32 {
    let clamped = value.clamp(*range.start(), *range.end());
    if clamped != value {
        tracing::warn!(param = name, value, clamped, "parameter clamped");
    }
    clamped
}

fn check_f32(name: &'static str, value: f32, range: RangeInclusive<f32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(Error::ParameterOutOfRange {
            name,
            value: value as f64,
            min: *range.start() as f64,
            max: *range.end() as f64,
        })
    }
}

fn check_u32(name: &'static str, value: u32, range: RangeInclusive<u32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(Error::ParameterOutOfRange {
            name,
            value: value as f64,
            min: *range.start() as f64,
            max: *range.end() as f64,
        })
    }
}
