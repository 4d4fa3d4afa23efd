//! Image archive metadata endpoint.
//!
//! One request to `/HPImageArchive.aspx` lists the most recent images of the
//! day. Any failure here is fatal for a run: nothing is downloaded without a
//! parsed record list.
//!
//! # Example
//!
//! ```no_run
//! use wallpaper_core::archive::ArchiveClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = reqwest::Client::new();
//! let archive = ArchiveClient::new(client, "https://www.bing.com", "en-US")?;
//! for record in archive.fetch_records(8).await? {
//!     println!("{} {}", record.end_date, record.copyright);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod record;

pub use client::{ArchiveClient, METADATA_PATH};
pub use error::ArchiveError;
pub use record::{ArchiveResponse, ImageRecord};
pub(crate) use record::COMPACT_DATE_FORMAT;
