//! URL rewriting that requests the highest-resolution rendition of an image.
//!
//! The archive hands out image paths sized for a desktop screen, e.g.
//! `/th?id=OHR.Example_1920x1080.jpg` or `/az/hprichbg/rb/Example_1920x1080.jpg`.
//! [`upgrade_url`] swaps any resolution tag in the path for the UHD marker and
//! forces the sizing query parameters the image service understands.
//!
//! The rewrite never fails. Input is split into components without validation
//! (relative references are fine), so a malformed URL comes back malformed in
//! the same way, just with the rewrites applied.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;
use url::form_urlencoded;

/// Path marker that replaces a resolution tag.
pub const DEFAULT_MARKER: &str = "_UHD";
/// Path marker identifying 8K content.
pub const DEFAULT_MARKER_8K: &str = "_8K";
/// Target width for regular content.
pub const DEFAULT_WIDTH: u32 = 3840;
/// Target height for regular content.
pub const DEFAULT_HEIGHT: u32 = 2160;
/// Target width for 8K content.
pub const DEFAULT_WIDTH_8K: u32 = 7680;
/// Target height for 8K content.
pub const DEFAULT_HEIGHT_8K: u32 = 4320;
/// Value of the rescale-enable flag.
pub const DEFAULT_RESCALE: u32 = 1;
/// Value of the quality-boost parameter.
pub const DEFAULT_QUALITY: u32 = 4;

const WIDTH_KEY: &str = "w";
const HEIGHT_KEY: &str = "h";
const RESCALE_KEY: &str = "rs";
const QUALITY_KEY: &str = "c";

/// Resolution tag in a path: underscore, digits, `x`, digits (`_1920x1080`).
#[allow(clippy::expect_used)]
static RESOLUTION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_\d+x\d+").expect("resolution tag regex is valid"));

/// Tunable constants for [`upgrade_url_with`].
///
/// These mirror what the image service currently honors; they are exposed so a
/// change upstream does not require a code change here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpgradeOptions {
    /// Replacement for a resolution tag in the path.
    pub marker: String,
    /// Requested width.
    pub width: u32,
    /// Requested height.
    pub height: u32,
    /// Rescale-enable flag (`rs`).
    pub rescale: u32,
    /// Quality-boost parameter (`c`).
    pub quality: u32,
    /// Literal path substring that selects the 8K dimensions.
    ///
    /// Unverified heuristic: the archive has not been observed to emit it.
    pub marker_8k: String,
    /// Requested width when the 8K marker is present.
    pub width_8k: u32,
    /// Requested height when the 8K marker is present.
    pub height_8k: u32,
}

impl Default for UpgradeOptions {
    fn default() -> Self {
        Self {
            marker: DEFAULT_MARKER.to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            rescale: DEFAULT_RESCALE,
            quality: DEFAULT_QUALITY,
            marker_8k: DEFAULT_MARKER_8K.to_string(),
            width_8k: DEFAULT_WIDTH_8K,
            height_8k: DEFAULT_HEIGHT_8K,
        }
    }
}

/// Rewrites `url` with the default [`UpgradeOptions`].
///
/// # Examples
///
/// ```
/// use wallpaper_core::upgrade_url;
///
/// let upgraded = upgrade_url("https://www.bing.com/az/Example_1920x1080.jpg");
/// assert_eq!(
///     upgraded,
///     "https://www.bing.com/az/Example_UHD.jpg?w=3840&h=2160&rs=1&c=4"
/// );
/// ```
#[must_use]
pub fn upgrade_url(url: &str) -> String {
    upgrade_url_with(url, &UpgradeOptions::default())
}

/// Rewrites `url` to request the highest-resolution rendition.
///
/// 1. Every resolution tag in the path becomes `options.marker`.
/// 2. `w`, `h`, `rs` and `c` are set, replacing any existing values. Other
///    parameters are kept; existing keys keep their position and new keys
///    are appended.
/// 3. If the rewritten path contains `options.marker_8k`, `w`/`h` use the
///    8K dimensions instead.
///
/// Scheme, authority and fragment pass through untouched. Applying the
/// rewrite twice yields the same string as applying it once.
#[must_use]
pub fn upgrade_url_with(url: &str, options: &UpgradeOptions) -> String {
    let parts = UrlParts::split(url);

    let path = RESOLUTION_TAG.replace_all(parts.path, options.marker.as_str());

    let mut query = QueryParams::parse(parts.query.unwrap_or(""));
    query.set(WIDTH_KEY, options.width);
    query.set(HEIGHT_KEY, options.height);
    query.set(RESCALE_KEY, options.rescale);
    query.set(QUALITY_KEY, options.quality);

    if !options.marker_8k.is_empty() && path.contains(options.marker_8k.as_str()) {
        query.set(WIDTH_KEY, options.width_8k);
        query.set(HEIGHT_KEY, options.height_8k);
    }

    let upgraded = parts.assemble(&path, &query.encode());
    trace!(original = %url, upgraded = %upgraded, "upgraded image URL");
    upgraded
}

/// Borrowed components of a URL or relative reference.
#[derive(Debug, PartialEq, Eq)]
struct UrlParts<'a> {
    /// `scheme://authority` (or `//authority`), empty for relative paths.
    origin: &'a str,
    path: &'a str,
    query: Option<&'a str>,
    fragment: Option<&'a str>,
}

impl<'a> UrlParts<'a> {
    fn split(input: &'a str) -> Self {
        let (rest, fragment) = match input.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (input, None),
        };
        let (hier, query) = match rest.split_once('?') {
            Some((hier, query)) => (hier, Some(query)),
            None => (rest, None),
        };

        let authority_start = if let Some(idx) = hier.find("://") {
            Some(idx + 3)
        } else if hier.starts_with("//") {
            Some(2)
        } else {
            None
        };
        let origin_end = authority_start.map_or(0, |start| {
            hier[start..].find('/').map_or(hier.len(), |offset| start + offset)
        });

        Self {
            origin: &hier[..origin_end],
            path: &hier[origin_end..],
            query,
            fragment,
        }
    }

    fn assemble(&self, path: &str, query: &str) -> String {
        let mut out = String::with_capacity(self.origin.len() + path.len() + query.len() + 2);
        out.push_str(self.origin);
        out.push_str(path);
        if !query.is_empty() {
            out.push('?');
            out.push_str(query);
        }
        if let Some(fragment) = self.fragment.filter(|f| !f.is_empty()) {
            out.push('#');
            out.push_str(fragment);
        }
        out
    }
}

/// Query parameters grouped by name, in first-seen order.
#[derive(Debug, Default)]
struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    fn parse(query: &str) -> Self {
        let mut params = Self::default();
        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match params.entries.iter_mut().find(|(k, _)| *k == key) {
                Some((_, values)) => values.push(value.into_owned()),
                None => params
                    .entries
                    .push((key.into_owned(), vec![value.into_owned()])),
            }
        }
        params
    }

    fn set(&mut self, key: &str, value: u32) {
        let value = vec![value.to_string()];
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some((_, values)) => *values = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    fn encode(&self) -> String {
        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, values) in &self.entries {
            for value in values {
                serializer.append_pair(key, value);
            }
        }
        serializer.finish()
    }

    #[cfg(test)]
    fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }
}
