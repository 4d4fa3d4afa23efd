//! CLI entry point for the wallpaper downloader.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info};
use wallpaper_core::{ArchiveDownloader, RunConfig, RunSummary};

mod cli;

use cli::Args;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    debug!(?args, "CLI arguments parsed");

    match run(args).await {
        Ok(summary) => {
            debug!(
                saved = summary.saved(),
                skipped = summary.skipped(),
                failed = summary.failed(),
                "run finished"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Critical error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<RunSummary> {
    let config = RunConfig::new(args.output_dir, args.days);
    info!(
        days = config.day_count,
        market = %config.market,
        "Fetching image archive"
    );

    let downloader =
        ArchiveDownloader::new(config).context("failed to initialize archive downloader")?;
    downloader
        .run()
        .await
        .context("failed to download image archive")
}
