//! Error types for the download module.
//!
//! These errors are scoped to one archive record. The orchestrator folds them
//! into [`ItemOutcome::Failed`](super::ItemOutcome::Failed) and moves on; they
//! never abort a run.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while saving a single image.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The record's end date is not a compact `YYYYMMDD` calendar date.
    #[error("invalid end date {value:?}: {source}")]
    InvalidDate {
        /// The rejected date string.
        value: String,
        /// The underlying parse error.
        #[source]
        source: chrono::ParseError,
    },

    /// The upgraded image URL could not be parsed.
    #[error("invalid URL: {url}")]
    InvalidUrl {
        /// The invalid URL string.
        url: String,
    },

    /// Network-level error (DNS resolution, connection refused, TLS errors, etc.)
    #[error("network error downloading {url}: {source}")]
    Network {
        /// The URL that failed to download.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// Request or body transfer exceeded the per-image timeout.
    #[error("timeout downloading {url}")]
    Timeout {
        /// The URL that timed out.
        url: String,
    },

    /// File system error while writing the image.
    #[error("IO error writing to {path}: {source}")]
    Io {
        /// The file path where the error occurred.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl DownloadError {
    /// Creates an invalid date error.
    pub fn invalid_date(value: impl Into<String>, source: chrono::ParseError) -> Self {
        Self::InvalidDate {
            value: value.into(),
            source,
        }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a network error, or a timeout error when reqwest reports one.
    pub fn from_reqwest(url: impl Into<String>, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout { url: url.into() }
        } else {
            Self::Network {
                url: url.into(),
                source,
            }
        }
    }

    /// Creates a timeout error.
    pub fn timeout(url: impl Into<String>) -> Self {
        Self::Timeout { url: url.into() }
    }

    /// Creates an IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

// No From<reqwest::Error> / From<io::Error>: every variant needs the URL or
// path, which the source errors do not carry.
