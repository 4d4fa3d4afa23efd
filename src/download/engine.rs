//! Archive run orchestration.
//!
//! [`ArchiveDownloader::run`] fetches the record list once, then walks it in
//! order: resolve the image URL, upgrade it, derive the filename, download.
//! Requests are awaited one at a time.
//!
//! Failures are two-tier. Anything before the loop (client setup, metadata
//! fetch or parse, output directory creation) is an [`ArchiveError`] and ends
//! the run with no files written. Anything inside the loop becomes an
//! [`ItemOutcome`] for that record and the loop continues.
//!
//! # Example
//!
//! ```no_run
//! use wallpaper_core::{RunConfig, run};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let summary = run(RunConfig::new("walls", 8)).await?;
//! println!("Saved {}/{}", summary.saved(), summary.total());
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, instrument, warn};

use super::client::{DownloadLimits, HttpClient, ImageFetch, build_client};
use super::constants::BYTES_PER_MIB;
use super::error::DownloadError;
use super::filename::derive_filename;
use crate::archive::{ArchiveClient, ArchiveError, ImageRecord};
use crate::config::RunConfig;
use crate::upgrade::upgrade_url_with;

/// Why an image was not written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Status 200 but the declared length was at or below the floor.
    TooSmall {
        /// Declared `Content-Length` (0 when absent).
        content_length: u64,
    },
    /// Any status other than 200.
    UnexpectedStatus {
        /// HTTP status code.
        status: u16,
        /// Declared `Content-Length` (0 when absent).
        content_length: u64,
    },
}

impl SkipReason {
    fn from_rejection(status: u16, content_length: u64) -> Self {
        if status == 200 {
            Self::TooSmall { content_length }
        } else {
            Self::UnexpectedStatus {
                status,
                content_length,
            }
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooSmall { .. } => f.write_str("small file"),
            Self::UnexpectedStatus { status, .. } => write!(f, "small file, HTTP {status}"),
        }
    }
}

/// Terminal state of one archive record.
#[derive(Debug)]
pub enum ItemOutcome {
    /// The image was written to the output directory.
    Saved {
        /// Output filename.
        filename: String,
        /// Bytes written.
        bytes: u64,
    },
    /// The server answered but the response was not accepted.
    Skipped {
        /// Output filename that would have been written.
        filename: String,
        /// Why the response was rejected.
        reason: SkipReason,
    },
    /// The record could not be downloaded.
    Failed {
        /// Output filename, or the record path when no filename could be derived.
        target: String,
        /// What went wrong.
        error: DownloadError,
    },
}

impl ItemOutcome {
    /// Returns true for [`ItemOutcome::Saved`].
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    /// Filename (or fallback target) this outcome refers to.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Saved { filename, .. } | Self::Skipped { filename, .. } => filename,
            Self::Failed { target, .. } => target,
        }
    }
}

/// Outcomes of a completed run.
#[derive(Debug)]
pub struct RunSummary {
    output_dir: PathBuf,
    outcomes: Vec<ItemOutcome>,
}

impl RunSummary {
    /// Creates an empty summary for `output_dir`.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            outcomes: Vec::new(),
        }
    }

    /// Appends the outcome of one record.
    pub fn record(&mut self, outcome: ItemOutcome) {
        self.outcomes.push(outcome);
    }

    /// Number of images written.
    #[must_use]
    pub fn saved(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Saved { .. }))
    }

    /// Number of responses rejected by the status/size gate.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    /// Number of records that failed with an error.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    /// Number of records attempted.
    #[must_use]
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Directory the images were written to.
    #[must_use]
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Per-record outcomes in archive order.
    #[must_use]
    pub fn outcomes(&self) -> &[ItemOutcome] {
        &self.outcomes
    }

    fn count(&self, predicate: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| predicate(*o)).count()
    }
}

/// Runs the fetch-and-save workflow described by a [`RunConfig`].
#[derive(Debug)]
pub struct ArchiveDownloader {
    archive: ArchiveClient,
    http: HttpClient,
    limits: DownloadLimits,
    config: RunConfig,
}

impl ArchiveDownloader {
    /// Creates a downloader. One HTTP client is shared by all requests.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::ClientBuild`] if the HTTP client cannot be
    /// built, or [`ArchiveError::InvalidUrl`] for a bad `api_base`.
    pub fn new(config: RunConfig) -> Result<Self, ArchiveError> {
        let client = build_client(&config.user_agent).map_err(ArchiveError::client_build)?;
        let archive = ArchiveClient::new(client.clone(), &config.api_base, config.market.clone())?;
        Ok(Self {
            archive,
            http: HttpClient::from_client(client),
            limits: DownloadLimits::from(&config),
            config,
        })
    }

    /// Fetches the record list and downloads every image.
    ///
    /// Per-record failures are logged and recorded in the summary; they do
    /// not stop the loop.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] if the metadata request fails, the body cannot
    /// be parsed, or the output directory cannot be created. No image is
    /// requested in that case.
    #[instrument(skip(self), fields(days = self.config.day_count, output_dir = %self.config.output_dir.display()))]
    pub async fn run(&self) -> Result<RunSummary, ArchiveError> {
        let records = self.archive.fetch_records(self.config.day_count).await?;
        info!(records = records.len(), "Fetched archive metadata");

        let output_dir = &self.config.output_dir;
        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| ArchiveError::output_dir(output_dir, e))?;

        let mut summary = RunSummary::new(output_dir);
        for record in &records {
            let outcome = self.process_record(record).await;
            log_outcome(&outcome);
            summary.record(outcome);
        }

        info!(
            saved = summary.saved(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "Success: {}/{} wallpapers saved to {}/",
            summary.saved(),
            summary.total(),
            output_dir.display()
        );

        Ok(summary)
    }

    /// Downloads one record and reports its terminal state.
    pub async fn process_record(&self, record: &ImageRecord) -> ItemOutcome {
        let base_url = record.absolute_url(&self.archive.image_host());
        let image_url = upgrade_url_with(&base_url, &self.config.upgrade);

        let filename = match derive_filename(&record.end_date, &record.copyright) {
            Ok(filename) => filename,
            Err(error) => {
                return ItemOutcome::Failed {
                    target: record.url.clone(),
                    error,
                };
            }
        };
        let path = self.config.output_dir.join(&filename);
        debug!(url = %image_url, path = %path.display(), title = ?record.title, "downloading image");

        match self.http.download_image(&image_url, &path, &self.limits).await {
            Ok(ImageFetch::Saved { bytes_written, .. }) => ItemOutcome::Saved {
                filename,
                bytes: bytes_written,
            },
            Ok(ImageFetch::Rejected {
                status,
                content_length,
            }) => ItemOutcome::Skipped {
                filename,
                reason: SkipReason::from_rejection(status, content_length),
            },
            Err(error) => ItemOutcome::Failed {
                target: filename,
                error,
            },
        }
    }
}

/// Fetches and downloads the archive described by `config`.
///
/// # Errors
///
/// Returns [`ArchiveError`] on any run-aborting failure; see
/// [`ArchiveDownloader::run`].
pub async fn run(config: RunConfig) -> Result<RunSummary, ArchiveError> {
    ArchiveDownloader::new(config)?.run().await
}

fn log_outcome(outcome: &ItemOutcome) {
    match outcome {
        ItemOutcome::Saved { filename, bytes } => {
            info!("Downloaded {filename} ({} MB)", format_mebibytes(*bytes));
        }
        ItemOutcome::Skipped { filename, reason } => {
            warn!("Skipped {filename} ({reason})");
        }
        ItemOutcome::Failed { target, error } => {
            error!("Error downloading {target}: {error}");
        }
    }
}

/// Formats a byte count as mebibytes with one decimal place.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn format_mebibytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / BYTES_PER_MIB)
}
