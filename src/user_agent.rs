//! Shared User-Agent string for archive and image requests.
//!
//! The metadata endpoint rejects requests without a browser-like agent, so the
//! string leads with the `Mozilla/5.0` product token and identifies the tool in
//! the comment section.

/// Project URL for User-Agent identification.
const PROJECT_UA_URL: &str = "https://github.com/fierce/wallpaper-dl";

/// Default User-Agent for all requests made by a run.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("Mozilla/5.0 (compatible; wallpaper-dl/{version}; +{PROJECT_UA_URL})")
}
