//! picbuf - crop, pad and blank raw planar video frames
//!
//! Reads and writes tightly packed raw files (`.yuv`, `.rgb`...), one plane
//! after the other.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "picbuf")]
#[command(author, version, about = "Crop, pad and blank raw planar video frames")]
#[command(long_about = "
Geometry operations on raw planar pictures.

Examples:
  picbuf info -f yuv420p -W 1920 -H 1080
  picbuf crop in.yuv out.yuv -W 1920 -H 1080 --hskip 8 --vskip 8 --width 1904 --height 1064
  picbuf crop in.yuv out.yuv -W 1920 -H 1080 --hskip=-16 --config margins.yaml
  picbuf clear in.yuv out.yuv -W 1920 -H 1080 --x 0 --y 0 --w 960
  picbuf clear in.yuv out.yuv -W 1920 -H 1080 --plane u8
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Show plane layout of a format
    #[command(visible_alias = "i")]
    Info(InfoArgs),

    /// Crop or pad a picture
    Crop(CropArgs),

    /// Blank a region with neutral values
    Clear(ClearArgs),
}

/// Picture geometry shared by all commands.
#[derive(Args)]
struct PictureArgs {
    /// Picture width in pixels
    #[arg(short = 'W', long = "hsize")]
    hsize: usize,

    /// Picture height in lines
    #[arg(short = 'H', long = "vsize")]
    vsize: usize,

    /// Format preset (yuv420p, nv12, uyvy422, rgb24...); defaults to the
    /// config's format, or yuv420p
    #[arg(short, long)]
    format: Option<String>,

    /// Manager config (YAML) with margins and alignment
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[derive(Args)]
struct InfoArgs {
    #[command(flatten)]
    picture: PictureArgs,
}

#[derive(Args)]
struct CropArgs {
    /// Input raw file
    input: PathBuf,

    /// Output raw file
    output: PathBuf,

    #[command(flatten)]
    picture: PictureArgs,

    /// Pixels to drop on the left (negative to pad)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    hskip: i64,

    /// Lines to drop at the top (negative to pad)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    vskip: i64,

    /// New width (-1 keeps the right edge)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    width: i64,

    /// New height (-1 keeps the bottom edge)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    height: i64,
}

#[derive(Args)]
struct ClearArgs {
    /// Input raw file
    input: PathBuf,

    /// Output raw file
    output: PathBuf,

    #[command(flatten)]
    picture: PictureArgs,

    /// Clear only this plane (default: all planes)
    #[arg(short, long)]
    plane: Option<String>,

    /// Region left edge (negative counts from the right)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    x: i64,

    /// Region top edge (negative counts from the bottom)
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    y: i64,

    /// Region width (-1 to the right edge)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    w: i64,

    /// Region height (-1 to the bottom edge)
    #[arg(long, default_value_t = -1, allow_negative_numbers = true)]
    h: i64,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Info(args) => commands::info::run(args, cli.verbose),
        Commands::Crop(args) => commands::crop::run(args, cli.verbose),
        Commands::Clear(args) => commands::clear::run(args, cli.verbose),
    }
}
