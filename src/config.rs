//! Run configuration.
//!
//! Every knob the orchestrator needs lives on [`RunConfig`]. The defaults are
//! tuned to the current behavior of the Bing image archive; callers override
//! individual fields with struct update syntax.

use std::path::PathBuf;
use std::time::Duration;

use crate::download::constants::{
    DEFAULT_DOWNLOAD_TIMEOUT_SECS, DEFAULT_MIN_CONTENT_LENGTH, DEFAULT_WRITE_BUFFER_BYTES,
};
use crate::upgrade::UpgradeOptions;
use crate::user_agent;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "bing_wallpapers";

/// Default number of recent days to request.
pub const DEFAULT_DAY_COUNT: u32 = 20;

/// Default market/locale code sent as `mkt`.
pub const DEFAULT_MARKET: &str = "en-US";

/// Default archive host. Record paths are resolved against it as well.
pub const DEFAULT_API_BASE: &str = "https://www.bing.com";

/// Configuration for a single archive run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory receiving downloaded images. Created with parents if missing.
    pub output_dir: PathBuf,
    /// Number of recent days requested from the metadata endpoint (`n`).
    pub day_count: u32,
    /// Market/locale code (`mkt`).
    pub market: String,
    /// Scheme and host of the archive, e.g. `https://www.bing.com`.
    pub api_base: String,
    /// User-Agent sent on every request.
    pub user_agent: String,
    /// Declared `Content-Length` must be strictly greater than this for an
    /// image to be saved. Rejects placeholder and error images.
    pub min_content_length: u64,
    /// Timeout for each image request. The metadata request has none.
    pub download_timeout: Duration,
    /// Size of the blocks written to disk while streaming a body.
    pub write_buffer_bytes: usize,
    /// URL upgrade parameters.
    pub upgrade: UpgradeOptions,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            day_count: DEFAULT_DAY_COUNT,
            market: DEFAULT_MARKET.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            user_agent: user_agent::default_user_agent(),
            min_content_length: DEFAULT_MIN_CONTENT_LENGTH,
            download_timeout: Duration::from_secs(DEFAULT_DOWNLOAD_TIMEOUT_SECS),
            write_buffer_bytes: DEFAULT_WRITE_BUFFER_BYTES,
            upgrade: UpgradeOptions::default(),
        }
    }
}

impl RunConfig {
    /// Creates a configuration for `output_dir` and `day_count`, with every
    /// other field at its default.
    #[must_use]
    pub fn new(output_dir: impl Into<PathBuf>, day_count: u32) -> Self {
        Self {
            output_dir: output_dir.into(),
            day_count,
            ..Self::default()
        }
    }
}
