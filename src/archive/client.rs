//! Metadata endpoint client.

use reqwest::Client;
use tracing::{debug, instrument};
use url::Url;

use super::error::ArchiveError;
use super::record::{ArchiveResponse, ImageRecord};

/// Path of the metadata endpoint on the archive host.
pub const METADATA_PATH: &str = "/HPImageArchive.aspx";

/// Response format requested from the metadata endpoint (JSON).
const FORMAT_JSON: &str = "js";

/// Client for the image archive metadata endpoint.
#[derive(Debug, Clone)]
pub struct ArchiveClient {
    client: Client,
    api_base: Url,
    market: String,
}

impl ArchiveClient {
    /// Creates a client for the archive at `api_base`.
    ///
    /// `client` should carry the browser-like User-Agent; the endpoint rejects
    /// anonymous requests.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError::InvalidUrl`] when `api_base` is not an absolute
    /// HTTP(S) URL.
    pub fn new(
        client: Client,
        api_base: &str,
        market: impl Into<String>,
    ) -> Result<Self, ArchiveError> {
        let parsed = Url::parse(api_base).map_err(|_| ArchiveError::invalid_url(api_base))?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(ArchiveError::invalid_url(api_base));
        }
        Ok(Self {
            client,
            api_base: parsed,
            market: market.into(),
        })
    }

    /// Scheme, host and port that relative record paths are resolved against,
    /// e.g. `https://www.bing.com`.
    #[must_use]
    pub fn image_host(&self) -> String {
        self.api_base.origin().ascii_serialization()
    }

    /// Builds the metadata request URL for the last `day_count` days.
    #[must_use]
    pub fn metadata_url(&self, day_count: u32) -> Url {
        let mut url = self.api_base.clone();
        url.set_path(METADATA_PATH);
        url.set_query(None);
        url.set_fragment(None);
        url.query_pairs_mut()
            .append_pair("format", FORMAT_JSON)
            .append_pair("n", &day_count.to_string())
            .append_pair("mkt", &self.market);
        url
    }

    /// Fetches the most recent `day_count` records.
    ///
    /// The archive may return fewer records than requested; it never returns
    /// more than its own historical limit.
    ///
    /// # Errors
    ///
    /// Returns [`ArchiveError`] on transport failure, non-success status, a
    /// body that is not JSON with an `images` array, or any record whose
    /// `enddate` is not a `YYYYMMDD` date.
    #[instrument(skip(self), fields(market = %self.market))]
    pub async fn fetch_records(&self, day_count: u32) -> Result<Vec<ImageRecord>, ArchiveError> {
        let url = self.metadata_url(day_count);
        debug!(url = %url, "requesting archive metadata");

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ArchiveError::network(url.as_str(), e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "archive metadata request failed");
            return Err(ArchiveError::http_status(url.as_str(), status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| ArchiveError::network(url.as_str(), e))?;
        let parsed: ArchiveResponse =
            serde_json::from_slice(&body).map_err(|e| ArchiveError::parse(url.as_str(), e))?;

        debug!(records = parsed.images.len(), "archive metadata parsed");
        Ok(parsed.images)
    }
}
