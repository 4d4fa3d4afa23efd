//! Output filename derivation.
//!
//! Filenames are a pure function of a record's end date and copyright line:
//! `YYYY-MM-DD_<Sanitized_Title>.jpg`. Two records with the same date and
//! title map to the same file, and the later one overwrites the earlier.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use super::constants::IMAGE_EXTENSION;
use crate::archive::COMPACT_DATE_FORMAT;
use super::error::DownloadError;

/// Start of the trailing attribution in a copyright line: `Title (© Agency)`.
const ATTRIBUTION_SEPARATOR: &str = " (";

/// Maximal runs of non-word characters.
#[allow(clippy::expect_used)]
static NON_WORD_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\W+").expect("non-word regex is valid"));

/// Builds the output filename for a record.
///
/// # Errors
///
/// Returns [`DownloadError::InvalidDate`] when `end_date` is not a valid
/// `YYYYMMDD` calendar date.
///
/// # Examples
///
/// ```
/// use wallpaper_core::derive_filename;
///
/// let name = derive_filename("20240115", "Aurora over Norway (© Example Corp)").unwrap();
/// assert_eq!(name, "2024-01-15_Aurora_over_Norway.jpg");
/// ```
pub fn derive_filename(end_date: &str, copyright: &str) -> Result<String, DownloadError> {
    let date = format_end_date(end_date)?;
    let title = sanitize_title(copyright);
    Ok(format!("{date}_{title}{IMAGE_EXTENSION}"))
}

/// Reformats a compact `YYYYMMDD` date as `YYYY-MM-DD`.
pub(crate) fn format_end_date(end_date: &str) -> Result<String, DownloadError> {
    NaiveDate::parse_from_str(end_date, COMPACT_DATE_FORMAT)
        .map(|date| date.format("%Y-%m-%d").to_string())
        .map_err(|e| DownloadError::invalid_date(end_date, e))
}

/// Drops the attribution and collapses each non-word run to one underscore.
pub(crate) fn sanitize_title(copyright: &str) -> String {
    let title = copyright
        .split_once(ATTRIBUTION_SEPARATOR)
        .map_or(copyright, |(head, _)| head);
    NON_WORD_RUN.replace_all(title, "_").into_owned()
}
