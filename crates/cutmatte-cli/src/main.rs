use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use cutmatte::io::{
    DEFAULT_MAX_DIMENSION, DEFAULT_OUTPUT_NAME, DecodeOptions, OutputFormat, decode_with_options,
    detect_format_from_bytes,
};
use cutmatte::{PipelineParams, run_pipeline};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod params_file;

use params_file::{ParamOverrides, ParamsFormat, load_params, render_params};

#[derive(Parser)]
#[command(name = "cutmatte")]
#[command(about = "Turn a logo image into a cutter-ready, alpha-matted silhouette")]
struct Cli {
    /// Log debug output (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode an image, run the matting pipeline and write the result
    Process {
        /// Input image (PNG, JPEG, GIF, BMP or WebP)
        input: PathBuf,

        /// Output file [default: cleaned.png beside the input]
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// YAML or JSON parameter file; flags override its values
        #[arg(long)]
        params: Option<PathBuf>,

        #[command(flatten)]
        overrides: ParamOverrides,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputKind::Png)]
        format: OutputKind,

        /// Downscale so the longer side is at most N pixels (0 keeps the original size)
        #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_DIMENSION)]
        max_dimension: u32,

        /// Reject out-of-range parameters instead of clamping them
        #[arg(long)]
        strict: bool,
    },
    /// Print the default parameter file
    Params {
        /// Serialization to print
        #[arg(long, value_enum, default_value_t = ParamsFormat::Yaml)]
        format: ParamsFormat,
    },
    /// Print format, size and opaque-region statistics of an image
    Inspect {
        /// Image to inspect
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputKind {
    Png,
    Webp,
}

impl From<OutputKind> for OutputFormat {
    fn from(kind: OutputKind) -> Self {
        match kind {
            OutputKind::Png => OutputFormat::Png,
            OutputKind::Webp => OutputFormat::WebpLossless,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Process {
            input,
            output,
            params,
            overrides,
            format,
            max_dimension,
            strict,
        } => run_process_command(
            &input,
            output,
            params.as_deref(),
            &overrides,
            format.into(),
            max_dimension,
            strict,
        ),
        Commands::Params { format } => {
            print!("{}", render_params(&PipelineParams::default(), format)?);
            Ok(())
        }
        Commands::Inspect { input } => run_inspect_command(&input),
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "cutmatte=debug" } else { "cutmatte=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();
}

/// Default output path: `cleaned.<ext>` next to the input.
fn default_output(input: &Path, format: OutputFormat) -> PathBuf {
    Path::new(DEFAULT_OUTPUT_NAME)
        .with_extension(format.extension())
        .file_name()
        .map(|name| input.with_file_name(name))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_NAME))
}

#[allow(clippy::too_many_arguments)]
fn run_process_command(
    input: &Path,
    output: Option<PathBuf>,
    params_path: Option<&Path>,
    overrides: &ParamOverrides,
    format: OutputFormat,
    max_dimension: u32,
    strict: bool,
) -> anyhow::Result<()> {
    let mut params = match params_path {
        Some(path) => load_params(path)?,
        None => PipelineParams::default(),
    };
    overrides.apply(&mut params)?;
    if strict {
        params.validate().context("parameter out of range")?;
    }

    let data = std::fs::read(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let options = DecodeOptions {
        max_dimension: (max_dimension > 0).then_some(max_dimension),
    };
    let source = decode_with_options(&data, &options)
        .with_context(|| format!("failed to decode {}", input.display()))?;

    let start = Instant::now();
    let result = run_pipeline(&source, &params);
    tracing::info!(
        width = result.width(),
        height = result.height(),
        matting = params.matting.name(),
        opaque = result.opaque_count(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "pipeline finished"
    );

    let output = output.unwrap_or_else(|| default_output(input, format));
    cutmatte::io::write_image(&result, &output, format)
        .with_context(|| format!("failed to write {}", output.display()))?;
    println!("{}", output.display());
    Ok(())
}

fn run_inspect_command(input: &Path) -> anyhow::Result<()> {
    let data = std::fs::read(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let format = detect_format_from_bytes(&data)
        .with_context(|| format!("unrecognized image {}", input.display()))?;
    let raster = decode_with_options(&data, &DecodeOptions::original_size())
        .with_context(|| format!("failed to decode {}", input.display()))?;
    let components = cutmatte::region::find_opaque_components(&raster);

    println!("format:      {format}");
    println!("size:        {}x{}", raster.width(), raster.height());
    println!("lossy:       {}", format.is_lossy());
    println!("opaque:      {} of {}", raster.opaque_count(), raster.pixel_count());
    println!("components:  {}", components.len());
    if let Some(largest) = components.iter().map(|c| c.size()).max() {
        println!("largest:     {largest}");
    }
    Ok(())
}
