//! Wallpaper Core Library
//!
//! This library provides the core functionality for the `wallpaper-dl` tool,
//! which fetches the image-of-the-day archive, rewrites each image URL to
//! request the highest available rendition, and saves the results to disk.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//! - [`config`] - Run configuration with documented defaults
//! - [`upgrade`] - URL rewriting for high-resolution renditions
//! - [`archive`] - Metadata endpoint client and record types
//! - [`download`] - Image download, filename derivation, and run orchestration

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod archive;
pub mod config;
pub mod download;
pub mod upgrade;
mod user_agent;

// Re-export commonly used types
pub use archive::{ArchiveClient, ArchiveError, ArchiveResponse, ImageRecord};
pub use config::RunConfig;
pub use download::{
    ArchiveDownloader, DownloadError, HttpClient, ItemOutcome, RunSummary, SkipReason,
    derive_filename, run,
};
pub use upgrade::{UpgradeOptions, upgrade_url, upgrade_url_with};
