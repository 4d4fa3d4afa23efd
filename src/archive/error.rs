//! Error types for the archive module.
//!
//! Every variant aborts the run before any image is requested.

use std::path::PathBuf;

use thiserror::Error;

/// Run-aborting errors: metadata fetch, metadata parse, or run setup.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The shared HTTP client could not be constructed.
    #[error("failed to build HTTP client: {source}")]
    ClientBuild {
        /// The underlying builder error.
        #[source]
        source: reqwest::Error,
    },

    /// The configured archive base is not a valid absolute URL.
    #[error("invalid archive URL: {url}")]
    InvalidUrl {
        /// The rejected URL string.
        url: String,
    },

    /// Transport failure talking to the metadata endpoint.
    #[error("network error fetching {url}: {source}")]
    Network {
        /// The metadata request URL.
        url: String,
        /// The underlying network error.
        #[source]
        source: reqwest::Error,
    },

    /// The metadata endpoint answered with a non-success status.
    #[error("HTTP {status} fetching {url}")]
    HttpStatus {
        /// The metadata request URL.
        url: String,
        /// The HTTP status code.
        status: u16,
    },

    /// The body was not the expected JSON document.
    #[error("malformed archive response from {url}: {source}")]
    Parse {
        /// The metadata request URL.
        url: String,
        /// The JSON error, including the missing `images` key case.
        #[source]
        source: serde_json::Error,
    },

    /// The output directory could not be created.
    #[error("cannot create output directory {path}: {source}")]
    OutputDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl ArchiveError {
    /// Creates a client construction error.
    pub fn client_build(source: reqwest::Error) -> Self {
        Self::ClientBuild { source }
    }

    /// Creates an invalid URL error.
    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    /// Creates a network error from a reqwest error.
    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Network {
            url: url.into(),
            source,
        }
    }

    /// Creates an HTTP status error.
    pub fn http_status(url: impl Into<String>, status: u16) -> Self {
        Self::HttpStatus {
            url: url.into(),
            status,
        }
    }

    /// Creates a parse error.
    pub fn parse(url: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            url: url.into(),
            source,
        }
    }

    /// Creates an output directory error.
    pub fn output_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputDir {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_error_http_status_display() {
        let error = ArchiveError::http_status("https://www.bing.com/HPImageArchive.aspx", 500);
        let msg = error.to_string();
        assert!(msg.contains("500"), "Expected '500' in: {msg}");
        assert!(msg.contains("HPImageArchive.aspx"), "Expected URL in: {msg}");
    }

    #[test]
    fn test_archive_error_parse_display() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let error = ArchiveError::parse("https://example.com/a", source);
        let msg = error.to_string();
        assert!(msg.starts_with("malformed archive response"), "got: {msg}");
        assert!(std::error::Error::source(&error).is_some());
    }

    #[test]
    fn test_archive_error_output_dir_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = ArchiveError::output_dir("/root/walls", io_error);
        let msg = error.to_string();
        assert!(msg.contains("/root/walls"), "Expected path in: {msg}");
    }

    #[test]
    fn test_archive_error_invalid_url_display() {
        let error = ArchiveError::invalid_url("not-a-url");
        assert_eq!(error.to_string(), "invalid archive URL: not-a-url");
    }
}
