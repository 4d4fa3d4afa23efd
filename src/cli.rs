//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use wallpaper_core::config::{DEFAULT_DAY_COUNT, DEFAULT_OUTPUT_DIR};

/// Upper bound accepted for `--days`; the archive applies its own, lower limit.
const MAX_DAY_COUNT: u32 = 100;

/// Download the image-of-the-day archive at the highest available resolution.
///
/// Fetches the most recent archive entries, requests each image as a UHD
/// rendition, and saves it as `YYYY-MM-DD_Title.jpg`.
#[derive(Parser, Debug)]
#[command(name = "wallpaper-dl")]
#[command(author, version, about)]
pub struct Args {
    /// Directory to save images into (created if missing)
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Number of recent days to request from the archive
    #[arg(short = 'n', long, default_value_t = DEFAULT_DAY_COUNT, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DAY_COUNT)))]
    pub days: u32,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}
