use serde::Serialize;

/// Normalized preview returned by `GET /api/v2`.
///
/// `title` and `site_name` are never absent; `description` and `image`
/// serialize as `null` when no source had them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPreview {
    pub title: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub site_name: String,
    pub hostname: String,
}

/// `{ "metadata": ... }` wrapper shared by both endpoints.
#[derive(Debug, Serialize)]
pub struct MetadataEnvelope<T> {
    pub metadata: Option<T>,
}

impl<T> MetadataEnvelope<T> {
    pub fn found(metadata: T) -> Self {
        Self {
            metadata: Some(metadata),
        }
    }

    pub fn empty() -> Self {
        Self { metadata: None }
    }
}
