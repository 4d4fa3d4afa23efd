//! Constants for the download module (timeouts, size gate, write sizes).

/// Per-image request timeout (30 seconds).
pub const DEFAULT_DOWNLOAD_TIMEOUT_SECS: u64 = 30;

/// Declared length floor; images at or below it are skipped (100,000 bytes).
pub const DEFAULT_MIN_CONTENT_LENGTH: u64 = 100_000;

/// Block size for writes to the output file (8 KiB).
pub const DEFAULT_WRITE_BUFFER_BYTES: usize = 8192;

/// Bytes per mebibyte, for size reporting.
pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Extension appended to every output filename.
pub const IMAGE_EXTENSION: &str = ".jpg";
