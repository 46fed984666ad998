// THEORY:
// The binary is a thin shell around the library: flags become a `PartitionConfig`,
// the input is decoded, partitioned and written as a GIF, and the frame count is
// reported. Every failure is surfaced with the path it concerns and a non-zero exit.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueHint};
use std::path::PathBuf;
use truecolor_gif::{FramePartitioner, PartitionConfig, load_image, save_gif};

#[derive(Parser, Debug)]
#[command(name = "truecolor_gif", version, about = "Encode an image as a truecolor animated GIF")]
struct Cli {
    /// Frame delay in multiples of 10ms. 2 is the fastest most viewers honor
    #[arg(long = "delay", default_value_t = 2)]
    delay: u16,

    /// Delay of the final frame in multiples of 10ms
    #[arg(long = "final-delay", default_value_t = 300)]
    final_delay: u16,

    /// Maximum number of frames. 0 = unlimited
    #[arg(long = "framelimit", default_value_t = 0)]
    frame_limit: usize,

    /// Backfill still missing pixels with the closest color
    #[arg(long = "backfill", default_value_t = true, action = ArgAction::Set)]
    backfill: bool,

    /// Sort colors by popularity
    #[arg(long = "sort", default_value_t = true, action = ArgAction::Set)]
    sort: bool,

    /// Threads used to scan the image. 0 = one per CPU
    #[arg(long = "threads", default_value_t = 0)]
    threads: usize,

    /// Output GIF path
    #[arg(short = 'o', long = "output", default_value = "out.gif", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Input image path
    #[arg(value_hint = ValueHint::FilePath)]
    input: PathBuf,
}

fn build_config(cli: &Cli) -> PartitionConfig {
    PartitionConfig::default()
        .with_frame_delay(cli.delay)
        .with_final_delay(cli.final_delay)
        .with_frame_limit(cli.frame_limit)
        .with_backfill(cli.backfill)
        .with_popularity_sort(cli.sort)
        .with_scan_threads(cli.threads)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let partitioner = FramePartitioner::new(build_config(&cli));

    let image = load_image(&cli.input)
        .with_context(|| format!("failed to read {}", cli.input.display()))?;
    let sequence = partitioner
        .partition(&image)
        .with_context(|| format!("failed to partition {}", cli.input.display()))?;
    save_gif(&cli.output, &sequence)
        .with_context(|| format!("failed to write {}", cli.output.display()))?;

    println!("Output {} frames to: {}", sequence.len(), cli.output.display());
    Ok(())
}
