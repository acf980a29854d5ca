use axum::extract::{Query, State};
use axum::Json;
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::extractor::ExtractOutcome;
use crate::models::{MetadataEnvelope, RawPageMetadata, ResolvedPreview};
use crate::normalize::normalize_url;
use crate::resolver::resolve;
use crate::state::AppState;

// ── Query params ───────────────────────────────────────────────────────────

/// The query is read as raw pairs rather than a struct so that a missing or
/// repeated `url` reaches the handler instead of failing in the extractor.
/// The first `url` wins.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PreviewQuery {
    pub url: Option<String>,
}

impl PreviewQuery {
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let url = pairs
            .into_iter()
            .find_map(|(key, value)| (key == "url").then_some(value));
        Self { url }
    }
}

// ── Handlers ───────────────────────────────────────────────────────────────

/// GET /api/v2?url=<url>
///
/// Normalizes and validates `url`, extracts the page metadata and resolves it
/// into a `ResolvedPreview`. 400 for a bad URL, 404 when the page had no
/// metadata, 500 (opaque) when extraction failed.
pub async fn get_preview(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<MetadataEnvelope<ResolvedPreview>>> {
    let params = PreviewQuery::from_pairs(pairs);
    let url = normalize_url(params.url.as_deref())?;

    info!(url = %url, "Resolving link preview");

    let raw = match state.extractor.extract(url.as_str()).await {
        ExtractOutcome::Found(raw) => Some(raw),
        ExtractOutcome::NotFound => None,
        ExtractOutcome::Failed(e) => return Err(e.into()),
    };

    let preview = resolve(&url, raw.as_ref()).ok_or(AppError::NotFound)?;
    Ok(Json(MetadataEnvelope::found(preview)))
}

/// GET /api?url=<url>
///
/// Legacy passthrough: no validation, raw extractor output. A page without
/// metadata is `200 { "metadata": null }`; failures map to 500 like v2.
pub async fn get_legacy_preview(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> AppResult<Json<MetadataEnvelope<RawPageMetadata>>> {
    let url = PreviewQuery::from_pairs(pairs).url.unwrap_or_default();

    info!(url = %url, "Fetching raw page metadata");

    match state.extractor.extract(&url).await {
        ExtractOutcome::Found(raw) => Ok(Json(MetadataEnvelope::found(raw))),
        ExtractOutcome::NotFound => Ok(Json(MetadataEnvelope::empty())),
        ExtractOutcome::Failed(e) => Err(e.into()),
    }
}
