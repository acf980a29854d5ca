use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;
use url::Url;

pub const DEFAULT_SCHEME: &str = "http://";

/// Scheme, optional `www.`, host, a 2-6 letter TLD, then an optional
/// port/path/query/fragment tail. Applied to already lower-cased input.
static URL_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https?://(?:www\.)?[-a-z0-9@:%._+~#=]{1,256}\.[a-z]{2,6}(?:[/?#:]\S*)?$")
        .expect("URL shape pattern is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid URL")]
pub struct InvalidUrl;

/// A user-supplied URL after case folding, scheme defaulting and validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    normalized: String,
    parsed: Url,
}

impl NormalizedUrl {
    /// The normalized string exactly as it is handed to the extractor.
    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    pub fn hostname(&self) -> &str {
        self.parsed.host_str().unwrap_or_default()
    }
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// Lower-case `raw`, prepend `http://` when it has no scheme separator, and
/// check the result looks like an absolute web URL.
pub fn normalize_url(raw: Option<&str>) -> Result<NormalizedUrl, InvalidUrl> {
    let raw = raw.filter(|s| !s.is_empty()).ok_or(InvalidUrl)?;

    let lowered = raw.to_lowercase();
    let normalized = if lowered.contains("://") {
        lowered
    } else {
        format!("{DEFAULT_SCHEME}{lowered}")
    };

    if !URL_SHAPE.is_match(&normalized) {
        return Err(InvalidUrl);
    }

    let parsed = Url::parse(&normalized).map_err(|_| InvalidUrl)?;
    match parsed.host_str() {
        Some(host) if !host.is_empty() => {}
        _ => return Err(InvalidUrl),
    }

    Ok(NormalizedUrl { normalized, parsed })
}
