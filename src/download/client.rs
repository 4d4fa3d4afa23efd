//! HTTP client wrapper for downloading images.
//!
//! This module provides the `HttpClient` struct which performs the size-gated,
//! streaming image download for a single archive record.

use std::path::Path;
use std::time::Duration;

use futures_util::StreamExt;
use reqwest::Client;
use reqwest::header::{ACCEPT_ENCODING, CONTENT_LENGTH};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, instrument};
use url::Url;

use super::constants::{
    DEFAULT_DOWNLOAD_TIMEOUT_SECS, DEFAULT_MIN_CONTENT_LENGTH, DEFAULT_WRITE_BUFFER_BYTES,
};
use super::error::DownloadError;
use crate::config::RunConfig;

/// Acceptance and transfer limits applied to each image request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DownloadLimits {
    /// Declared `Content-Length` must be strictly greater than this.
    pub min_content_length: u64,
    /// Timeout covering the request and the body transfer.
    pub timeout: Duration,
    /// Block size for writes to the output file.
    pub write_buffer_bytes: usize,
}

impl Default for DownloadLimits {
    fn default() -> Self {
        Self {
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
            timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            write_buffer_bytes: DEFAULT_WRITE_BUFFER_BYTES,
        }
    }
}

impl From<&RunConfig> for DownloadLimits {
    fn from(config: &RunConfig) -> Self {
        Self {
            min_content_length: config.min_content_length,
            timeout: config.download_timeout,
            write_buffer_bytes: config.write_buffer_bytes,
        }
    }
}

/// Result of an image request that reached the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFetch {
    /// The body was written to disk.
    Saved {
        /// Bytes written to the output file.
        bytes_written: u64,
        /// Declared `Content-Length`.
        content_length: u64,
    },
    /// Status was not 200 or the declared length was at or below the floor.
    /// Nothing was written.
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Declared `Content-Length` (0 when absent).
        content_length: u64,
    },
}

/// HTTP client for image downloads.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a client that identifies itself with `user_agent`.
    ///
    /// # Errors
    ///
    /// Returns the reqwest builder error if the TLS backend cannot be
    /// initialized.
    pub fn new(user_agent: &str) -> Result<Self, reqwest::Error> {
        Ok(Self::from_client(build_client(user_agent)?))
    }

    /// Wraps an existing reqwest client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    /// Downloads one image to `path` if the response passes the size gate.
    ///
    /// The response is accepted only when the status is exactly 200 and the
    /// declared `Content-Length` exceeds `limits.min_content_length`. An
    /// accepted body is streamed to `path`, replacing any existing file. A
    /// partially written file is removed when the transfer fails.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The URL is invalid
    /// - The request fails or exceeds `limits.timeout`
    /// - Writing to disk fails
    #[instrument(skip(self, limits), fields(url = %url))]
    pub async fn download_image(
        &self,
        url: &str,
        path: &Path,
        limits: &DownloadLimits,
    ) -> Result<ImageFetch, DownloadError> {
        let parsed = Url::parse(url).map_err(|_| DownloadError::invalid_url(url))?;

        // Identity encoding keeps Content-Length describing the image bytes.
        let response = self
            .client
            .get(parsed)
            .header(ACCEPT_ENCODING, "identity")
            .timeout(limits.timeout)
            .send()
            .await
            .map_err(|e| DownloadError::from_reqwest(url, e))?;

        let status = response.status().as_u16();
        let content_length = declared_content_length(&response);
        debug!(status, content_length, "image response received");

        if status != 200 || content_length <= limits.min_content_length {
            return Ok(ImageFetch::Rejected {
                status,
                content_length,
            });
        }

        let file = File::create(path)
            .await
            .map_err(|e| DownloadError::io(path, e))?;

        match stream_to_file(file, response, url, path, limits.write_buffer_bytes).await {
            Ok(bytes_written) => {
                debug!(path = %path.display(), bytes = bytes_written, "image written");
                Ok(ImageFetch::Saved {
                    bytes_written,
                    content_length,
                })
            }
            Err(error) => {
                debug!(path = %path.display(), "removing partial file after error");
                let _ = tokio::fs::remove_file(path).await;
                Err(error)
            }
        }
    }
}

/// Builds the reqwest client shared by metadata and image requests.
///
/// No client-wide timeout: the metadata request is unbounded and image
/// requests set their own.
pub(crate) fn build_client(user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder().gzip(true).user_agent(user_agent).build()
}

/// Streams the response body to `file` in blocks of `block_size` bytes,
/// returning bytes written.
async fn stream_to_file(
    file: File,
    response: reqwest::Response,
    url: &str,
    path: &Path,
    block_size: usize,
) -> Result<u64, DownloadError> {
    let block_size = block_size.max(1);
    let mut writer = BufWriter::with_capacity(block_size, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::from_reqwest(url, e))?;

        for block in chunk.chunks(block_size) {
            writer
                .write_all(block)
                .await
                .map_err(|e| DownloadError::io(path, e))?;
        }

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    Ok(bytes_written)
}

/// Declared body length; 0 when the header is missing or unparsable.
fn declared_content_length(response: &reqwest::Response) -> u64 {
    response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}
