use serde::{Deserialize, Serialize};

mod link_preview;

pub use link_preview::{MetadataEnvelope, ResolvedPreview};

// ============================================================================
// Raw page metadata
// ============================================================================

/// Everything the extractor could read off a single page.
///
/// All three parts are always present; each may be empty internally. A page
/// that yielded nothing at all is represented by the extractor's `NotFound`
/// outcome, never by an empty `RawPageMetadata`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPageMetadata {
    /// Image candidates in document order.
    pub images: Vec<ImageCandidate>,
    pub og: OpenGraph,
    pub meta: MetaTags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageCandidate {
    pub url: String,
}

impl ImageCandidate {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// `og:*` properties.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenGraph {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
}

/// Generic `<title>` / `<meta name="...">` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaTags {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
