//! Pipeline orchestrator
//!
//! Runs the stages in their fixed order over one source raster:
//!
//! ```text
//! Contrast -> Median -> Denoise -> Matting -> Erosion -> Dilation
//!   -> Despeckle -> Blur -> Sharpen -> TextHighlight -> Invert
//! ```
//!
//! Every stage is a pure `&Raster -> Raster` transform, and inactive stages
//! are skipped. Parameters are clamped before the first stage runs.
//!
//! [`run_pipeline`] is the plain entry point. [`run_pipeline_cancellable`]
//! additionally checks a [`CancelToken`] between stages and can reuse
//! intermediate results from a [`StageCache`].

use cutmatte_core::{MattingMethod, PipelineParams, Raster};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use thiserror::Error;

/// One step of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Global contrast TRC
    Contrast,
    /// 3x3 median filter
    Median,
    /// Bilateral-style smoothing
    Denoise,
    /// Luminance to alpha
    Matting,
    /// Alpha erosion
    Erosion,
    /// Alpha dilation
    Dilation,
    /// Small cluster removal
    Despeckle,
    /// Alpha box blur
    Blur,
    /// RGB sharpening of the opaque design
    Sharpen,
    /// Local contrast boost near edges
    TextHighlight,
    /// RGB inversion
    Invert,
}

impl Stage {
    /// All stages in execution order.
    pub const ALL: [Stage; 11] = [
        Stage::Contrast,
        Stage::Median,
        Stage::Denoise,
        Stage::Matting,
        Stage::Erosion,
        Stage::Dilation,
        Stage::Despeckle,
        Stage::Blur,
        Stage::Sharpen,
        Stage::TextHighlight,
        Stage::Invert,
    ];

    /// Stage name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Stage::Contrast => "contrast",
            Stage::Median => "median",
            Stage::Denoise => "denoise",
            Stage::Matting => "matting",
            Stage::Erosion => "erosion",
            Stage::Dilation => "dilation",
            Stage::Despeckle => "despeckle",
            Stage::Blur => "blur",
            Stage::Sharpen => "sharpen",
            Stage::TextHighlight => "text-highlight",
            Stage::Invert => "invert",
        }
    }

    /// Whether the stage does anything under `params`.
    pub fn is_active(self, params: &PipelineParams) -> bool {
        match self {
            Stage::Contrast => params.contrast != 1.0,
            Stage::Median => params.median_filter,
            Stage::Denoise => params.denoise_strength > 0,
            Stage::Matting => params.remove_background,
            Stage::Erosion => params.erosion_passes > 0,
            Stage::Dilation => params.dilation_passes > 0,
            Stage::Despeckle => params.min_cluster_size > 1,
            Stage::Blur => params.blur_radius > 0,
            Stage::Sharpen => params.sharpen_intensity > 0.0,
            Stage::TextHighlight => params.text_highlight_intensity > 0.0,
            Stage::Invert => params.invert_colors,
        }
    }

    /// Apply this stage alone. Inactive stages return the input.
    pub fn apply(self, raster: &Raster, params: &PipelineParams) -> Raster {
        if !self.is_active(params) {
            return raster.clone();
        }
        match self {
            Stage::Contrast => cutmatte_filter::adjust_contrast(raster, params.contrast),
            Stage::Median => cutmatte_filter::median_filter(raster),
            Stage::Denoise => cutmatte_filter::bilateral_denoise(raster, params.denoise_strength),
            Stage::Matting => cutmatte_color::apply_matting(raster, &params.matting),
            Stage::Erosion => cutmatte_morph::erode_alpha(raster, params.erosion_passes),
            Stage::Dilation => cutmatte_morph::dilate_alpha(raster, params.dilation_passes),
            Stage::Despeckle => {
                let (out, stats) =
                    cutmatte_region::despeckle_with_stats(raster, params.min_cluster_size);
                tracing::debug!(
                    components = stats.components,
                    removed_components = stats.removed_components,
                    removed_pixels = stats.removed_pixels,
                    "despeckle"
                );
                out
            }
            Stage::Blur => cutmatte_filter::blur_alpha(raster, params.blur_radius),
            Stage::Sharpen => cutmatte_filter::sharpen(raster, params.sharpen_intensity),
            Stage::TextHighlight => {
                cutmatte_filter::text_highlight(raster, params.text_highlight_intensity)
            }
            Stage::Invert => cutmatte_filter::invert(raster),
        }
    }

    /// The parameters this stage reads, or `Off` when it is inactive.
    fn key(self, params: &PipelineParams) -> StageKey {
        if !self.is_active(params) {
            return StageKey::Off;
        }
        match self {
            Stage::Contrast => StageKey::Factor(params.contrast),
            Stage::Median | Stage::Invert => StageKey::On,
            Stage::Denoise => StageKey::Count(params.denoise_strength),
            Stage::Matting => StageKey::Matting(params.matting),
            Stage::Erosion => StageKey::Count(params.erosion_passes),
            Stage::Dilation => StageKey::Count(params.dilation_passes),
            Stage::Despeckle => StageKey::Count(params.min_cluster_size),
            Stage::Blur => StageKey::Count(params.blur_radius),
            Stage::Sharpen => StageKey::Factor(params.sharpen_intensity),
            Stage::TextHighlight => StageKey::Factor(params.text_highlight_intensity),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum StageKey {
    Off,
    On,
    Count(u32),
    Factor(f32),
    Matting(MattingMethod),
}

/// Run every stage over `raster`.
///
/// Parameters are clamped first. An empty raster is returned unchanged.
pub fn run_pipeline(raster: &Raster, params: &PipelineParams) -> Raster {
    let params = params.clamped();
    if raster.is_empty() {
        tracing::debug!(
            width = raster.width(),
            height = raster.height(),
            "empty image, pipeline skipped"
        );
        return raster.clone();
    }
    Stage::ALL
        .into_iter()
        .fold(raster.clone(), |current, stage| run_stage(stage, &current, &params))
}

fn run_stage(stage: Stage, input: &Raster, params: &PipelineParams) -> Raster {
    if !stage.is_active(params) {
        return input.clone();
    }
    let _span = tracing::debug_span!("stage", name = stage.name()).entered();
    let start = Instant::now();
    let out = stage.apply(input, params);
    tracing::debug!(elapsed_us = start.elapsed().as_micros() as u64, "stage done");
    out
}

/// A run was abandoned because a newer one superseded it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("pipeline run cancelled before stage {stage}")]
pub struct Cancelled {
    /// The stage that would have run next
    pub stage: Stage,
}

/// Cooperative cancellation flag for one run.
///
/// A token belongs to one generation and is cancelled as soon as the
/// shared latest-generation counter moves past it.
#[derive(Debug, Clone)]
pub struct CancelToken {
    generation: u64,
    latest: Arc<AtomicU64>,
}

impl CancelToken {
    /// A standalone token, cancelled only through [`CancelToken::cancel`].
    pub fn new() -> Self {
        Self::for_generation(Arc::new(AtomicU64::new(0)), 0)
    }

    /// A token for `generation`, watching a shared latest-generation counter.
    pub fn for_generation(latest: Arc<AtomicU64>, generation: u64) -> Self {
        Self { generation, latest }
    }

    /// The generation this token belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Supersede this token's generation.
    pub fn cancel(&self) {
        self.latest.fetch_max(self.generation + 1, Ordering::AcqRel);
    }

    /// True once a newer generation exists.
    pub fn is_cancelled(&self) -> bool {
        self.latest.load(Ordering::Acquire) != self.generation
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Intermediate results of the previous run over one source raster.
///
/// Entry `i` holds the output of stage `i`, valid as long as the keys of
/// stages `0..=i` are unchanged. A run reuses the longest such prefix and
/// recomputes the rest.
#[derive(Debug, Default)]
pub struct StageCache {
    source: Option<Raster>,
    entries: Vec<CacheEntry>,
    last_hits: usize,
}

#[derive(Debug)]
struct CacheEntry {
    key: StageKey,
    output: Raster,
}

impl StageCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stage outputs held.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stages reused by the most recent run.
    pub fn last_hits(&self) -> usize {
        self.last_hits
    }

    /// Drop every cached result.
    pub fn clear(&mut self) {
        self.source = None;
        self.entries.clear();
        self.last_hits = 0;
    }

    fn begin(&mut self, source: &Raster) {
        if self.source.as_ref() != Some(source) {
            self.clear();
            self.source = Some(source.clone());
        }
        self.last_hits = 0;
    }

    fn lookup(&mut self, index: usize, key: &StageKey) -> Option<Raster> {
        match self.entries.get(index) {
            Some(entry) if entry.key == *key => {
                self.last_hits += 1;
                Some(entry.output.clone())
            }
            _ => {
                self.entries.truncate(index);
                None
            }
        }
    }

    fn store(&mut self, index: usize, key: StageKey, output: &Raster) {
        debug_assert_eq!(self.entries.len(), index);
        self.entries.push(CacheEntry {
            key,
            output: output.clone(),
        });
    }
}

/// Run every stage, checking `token` before each one.
///
/// With a cache, the longest prefix of stages whose parameters match the
/// cached run is reused and the rest is recomputed and stored. The result
/// is identical to [`run_pipeline`].
///
/// # Errors
///
/// Returns [`Cancelled`] as soon as the token reports a newer generation.
pub fn run_pipeline_cancellable(
    raster: &Raster,
    params: &PipelineParams,
    token: &CancelToken,
    mut cache: Option<&mut StageCache>,
) -> Result<Raster, Cancelled> {
    let params = params.clamped();
    if raster.is_empty() {
        return Ok(raster.clone());
    }
    if let Some(cache) = cache.as_deref_mut() {
        cache.begin(raster);
    }

    let mut current = raster.clone();
    for (index, stage) in Stage::ALL.into_iter().enumerate() {
        if token.is_cancelled() {
            tracing::debug!(generation = token.generation(), stage = stage.name(), "run cancelled");
            return Err(Cancelled { stage });
        }
        let key = stage.key(&params);
        if let Some(cache) = cache.as_deref_mut() {
            if let Some(hit) = cache.lookup(index, &key) {
                current = hit;
                continue;
            }
        }
        current = run_stage(stage, &current, &params);
        if let Some(cache) = cache.as_deref_mut() {
            cache.store(index, key, &current);
        }
    }
    if let Some(cache) = cache.as_deref() {
        tracing::debug!(reused = cache.last_hits(), "run complete");
    }
    Ok(current)
}
