//! Enhance command - contrast enhancement for receipt photos.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::info;

use facturape_core::ContrastEnhancer;

use super::config::load_config;

/// Arguments for the enhance command.
#[derive(Args)]
pub struct EnhanceArgs {
    /// Input image (PNG, JPEG, TIFF, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Output image; format follows the extension
    #[arg(short, long)]
    output: PathBuf,

    /// Histogram clip limit (overrides config)
    #[arg(long)]
    clip_limit: Option<f32>,

    /// Tiles per axis (overrides config)
    #[arg(long)]
    tile_grid: Option<u32>,
}

pub async fn run(args: EnhanceArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut enhancer = ContrastEnhancer::from_config(&config.preprocessing);
    if let Some(clip_limit) = args.clip_limit {
        enhancer = enhancer.with_clip_limit(clip_limit);
    }
    if let Some(tile_grid) = args.tile_grid {
        enhancer = enhancer.with_tile_grid(tile_grid);
    }

    info!("Enhancing {}", args.input.display());
    let image = image::open(&args.input)?;
    let enhanced = enhancer.enhance(&image)?;
    enhanced.save(&args.output)?;

    println!(
        "{} Enhanced image written to {} ({}x{}, {:?})",
        style("✓").green(),
        args.output.display(),
        enhanced.width(),
        enhanced.height(),
        start.elapsed()
    );

    Ok(())
}
