//! Image download and run orchestration.
//!
//! This module turns archive records into files on disk.
//!
//! # Features
//!
//! - Streaming downloads written in fixed-size blocks
//! - Status and declared-length gate against placeholder images
//! - Deterministic `YYYY-MM-DD_Title.jpg` filenames
//! - Per-record typed outcomes aggregated into a [`RunSummary`]
//!
//! # Example
//!
//! ```no_run
//! use wallpaper_core::download::{DownloadLimits, HttpClient};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new("Mozilla/5.0")?;
//! let fetch = client
//!     .download_image(
//!         "https://www.bing.com/th?id=OHR.Example_UHD.jpg&w=3840&h=2160&rs=1&c=4",
//!         Path::new("./2024-01-15_Example.jpg"),
//!         &DownloadLimits::default(),
//!     )
//!     .await?;
//! println!("{fetch:?}");
//! # Ok(())
//! # }
//! ```

mod client;
pub(crate) mod constants;
mod engine;
mod error;
mod filename;

pub use client::{DownloadLimits, HttpClient, ImageFetch};
pub use engine::{ArchiveDownloader, ItemOutcome, RunSummary, SkipReason, run};
pub use error::DownloadError;
pub use filename::derive_filename;

// Note: no module-local Result aliases.
// Use `Result<T, DownloadError>` explicitly in function signatures.
