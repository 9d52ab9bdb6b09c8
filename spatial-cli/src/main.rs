//! spatial-mix - command-line front end
//!
//! Loads up to four WAV tracks, pans each one, mixes them into a single
//! stereo buffer and writes it out.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::Args;
use log::info;
use spatial_io::{load_tracks, write_audio, OutputFormat};
use spatial_mix::{MixRequest, MixStats, SpatialMixer};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn init_logging(level: log::LevelFilter) {
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn run(args: &Args) -> Result<MixStats> {
    args.validate()?;

    let tracks = load_tracks(&args.inputs).context("failed to load input tracks")?;
    let request = MixRequest::new(tracks, args.pan_values());

    let result = SpatialMixer::new(args.mix_config())
        .mix(request)
        .context("failed to mix tracks")?;

    let format = args
        .format
        .map(OutputFormat::from)
        .unwrap_or_else(|| result.buffer().format().into());
    let stats = result.stats();

    write_audio(&result.into_buffer(), &args.output, format)
        .with_context(|| format!("failed to export mix to {}", args.output.display()))?;

    info!(
        "Mixed {} tracks into {} ({} frames, {} samples clipped)",
        stats.tracks,
        args.output.display(),
        stats.frames,
        stats.clipped_samples
    );
    Ok(stats)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_level());
    run(&args).map(|_| ())
}
