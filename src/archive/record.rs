//! Metadata response types.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, de};

/// Compact date layout used by `startdate` and `enddate`.
pub(crate) const COMPACT_DATE_FORMAT: &str = "%Y%m%d";

/// Top-level metadata response.
///
/// Only `images` is required; `tooltips` and friends are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveResponse {
    /// Records in the order the archive returned them (newest first).
    pub images: Vec<ImageRecord>,
}

/// One image-of-the-day entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ImageRecord {
    /// Path relative to the archive host, e.g. `/th?id=OHR.Example_1920x1080.jpg&pid=hp`.
    pub url: String,
    /// Last day the image was featured, compact `YYYYMMDD`.
    ///
    /// Validated as a calendar date while parsing, so a bad value fails the
    /// whole response.
    #[serde(rename = "enddate", deserialize_with = "compact_date")]
    pub end_date: String,
    /// Description with a trailing `(© Photographer/Agency)` attribution.
    pub copyright: String,
    /// First day the image was featured, compact `YYYYMMDD`.
    #[serde(rename = "startdate", default)]
    pub start_date: Option<String>,
    /// Short headline, when the archive supplies one.
    #[serde(default)]
    pub title: Option<String>,
}

impl ImageRecord {
    /// Resolves the record path against `base` (scheme and host).
    ///
    /// Paths that are already absolute are returned unchanged.
    #[must_use]
    pub fn absolute_url(&self, base: &str) -> String {
        if self.url.starts_with("http://") || self.url.starts_with("https://") {
            return self.url.clone();
        }
        let base = base.trim_end_matches('/');
        if self.url.starts_with('/') {
            format!("{base}{}", self.url)
        } else {
            format!("{base}/{}", self.url)
        }
    }
}

fn compact_date<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    NaiveDate::parse_from_str(&value, COMPACT_DATE_FORMAT)
        .map_err(|e| de::Error::custom(format!("invalid enddate {value:?}: {e}")))?;
    Ok(value)
}
