//! Parameter files and command-line overrides

use anyhow::{Context, bail};
use clap::Args;
use cutmatte::{MattingMethod, PipelineParams};
use std::path::Path;

/// Serialization used for parameter files
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ParamsFormat {
    Yaml,
    Json,
}

impl ParamsFormat {
    /// Pick the format from a file extension; anything but `.json` is YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ParamsFormat::Json,
            _ => ParamsFormat::Yaml,
        }
    }
}

/// Load parameters from a YAML or JSON file. Missing fields take defaults.
pub fn load_params(path: &Path) -> anyhow::Result<PipelineParams> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read parameter file {}", path.display()))?;
    parse_params(&text, ParamsFormat::from_path(path))
        .with_context(|| format!("invalid parameter file {}", path.display()))
}

pub fn parse_params(text: &str, format: ParamsFormat) -> anyhow::Result<PipelineParams> {
    Ok(match format {
        ParamsFormat::Yaml => serde_yaml::from_str(text)?,
        ParamsFormat::Json => serde_json::from_str(text)?,
    })
}

pub fn render_params(params: &PipelineParams, format: ParamsFormat) -> anyhow::Result<String> {
    Ok(match format {
        ParamsFormat::Yaml => serde_yaml::to_string(params)?,
        ParamsFormat::Json => serde_json::to_string_pretty(params)? + "\n",
    })
}

/// Parse `A,B` into two channel values.
fn parse_pair(s: &str) -> Result<(u8, u8), String> {
    let Some((a, b)) = s.split_once(',') else {
        return Err(format!("expected two values separated by a comma, got '{s}'"));
    };
    let parse = |v: &str| {
        v.trim()
            .parse::<u8>()
            .map_err(|_| format!("'{}' is not a value in 0..=255", v.trim()))
    };
    Ok((parse(a)?, parse(b)?))
}

/// Per-field overrides applied on top of the defaults or a parameter file
#[derive(Debug, Default, Args)]
pub struct ParamOverrides {
    /// Contrast factor (0.5 - 2.5, 1.0 = unchanged)
    #[arg(long)]
    pub contrast: Option<f32>,

    /// Bilateral denoise strength (0 - 10)
    #[arg(long)]
    pub denoise: Option<u32>,

    /// Run the 3x3 median filter
    #[arg(long)]
    pub median: bool,

    /// Alpha erosion passes (0 - 5)
    #[arg(long)]
    pub erode: Option<u32>,

    /// Alpha dilation passes (0 - 5)
    #[arg(long)]
    pub dilate: Option<u32>,

    /// Remove opaque clusters smaller than this (0 - 500)
    #[arg(long)]
    pub min_cluster: Option<u32>,

    /// Alpha blur radius (0 - 10)
    #[arg(long)]
    pub blur: Option<u32>,

    /// Sharpen intensity (0 - 10)
    #[arg(long)]
    pub sharpen: Option<f32>,

    /// Text highlight intensity (0 - 10)
    #[arg(long)]
    pub text_highlight: Option<f32>,

    /// Invert RGB of the result
    #[arg(long)]
    pub invert: bool,

    /// Skip matting and keep the source alpha
    #[arg(long)]
    pub keep_background: bool,

    /// Blend-if matting with luminance band MIN,MAX
    #[arg(long, value_name = "MIN,MAX", value_parser = parse_pair, group = "matting")]
    pub blend_if: Option<(u8, u8)>,

    /// Color-range matting with a luminance threshold
    #[arg(long, value_name = "T", group = "matting")]
    pub color_range: Option<u8>,

    /// Channels matting with levels BLACK,WHITE
    #[arg(long, value_name = "BLACK,WHITE", value_parser = parse_pair, group = "matting")]
    pub channels: Option<(u8, u8)>,
}

impl ParamOverrides {
    /// Apply every given override to `params`.
    pub fn apply(&self, params: &mut PipelineParams) -> anyhow::Result<()> {
        if let Some(v) = self.contrast {
            params.contrast = v;
        }
        if let Some(v) = self.denoise {
            params.denoise_strength = v;
        }
        if self.median {
            params.median_filter = true;
        }
        if let Some(v) = self.erode {
            params.erosion_passes = v;
        }
        if let Some(v) = self.dilate {
            params.dilation_passes = v;
        }
        if let Some(v) = self.min_cluster {
            params.min_cluster_size = v;
        }
        if let Some(v) = self.blur {
            params.blur_radius = v;
        }
        if let Some(v) = self.sharpen {
            params.sharpen_intensity = v;
        }
        if let Some(v) = self.text_highlight {
            params.text_highlight_intensity = v;
        }
        if self.invert {
            params.invert_colors = true;
        }
        if self.keep_background {
            params.remove_background = false;
        }

        let methods = [
            self.blend_if
                .map(|(min, max)| MattingMethod::BlendIf { min, max }),
            self.color_range
                .map(|threshold| MattingMethod::ColorRange { threshold }),
            self.channels.map(|(black_point, white_point)| MattingMethod::Channels {
                black_point,
                white_point,
            }),
        ];
        let mut chosen = methods.into_iter().flatten();
        if let Some(method) = chosen.next() {
            if chosen.next().is_some() {
                bail!("only one matting method may be given");
            }
            params.matting = method;
        }
        Ok(())
    }
}
