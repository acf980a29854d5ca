use axum::async_trait;
use thiserror::Error;

use crate::models::RawPageMetadata;

mod html;

pub use html::{is_private_ip, parse_page, HtmlExtractor};

/// Result of a single extraction attempt.
///
/// `NotFound` means the page was reachable (or not worth fetching) but gave
/// us nothing to work with. `Failed` is reserved for unexpected faults.
#[derive(Debug)]
pub enum ExtractOutcome {
    Found(RawPageMetadata),
    NotFound,
    Failed(ExtractError),
}

impl From<Result<Option<RawPageMetadata>, ExtractError>> for ExtractOutcome {
    fn from(result: Result<Option<RawPageMetadata>, ExtractError>) -> Self {
        match result {
            Ok(Some(raw)) => ExtractOutcome::Found(raw),
            Ok(None) => ExtractOutcome::NotFound,
            Err(e) => ExtractOutcome::Failed(e),
        }
    }
}

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Failed to fetch page: {0}")]
    Fetch(#[source] reqwest::Error),

    #[error("Failed to read page body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("Could not resolve host {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Host {0} resolves to a private or reserved address")]
    Blocked(String),
}

/// Source of raw page metadata for a URL.
///
/// Implementations may be slow and may fail; callers treat them as a black
/// box and never retry.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract(&self, url: &str) -> ExtractOutcome;
}
