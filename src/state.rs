use std::sync::Arc;

use crate::extractor::MetadataExtractor;

/// Shared application state passed to all handlers.
///
/// Immutable after startup; the extractor is shared behind an `Arc` so every
/// request uses the same HTTP connection pool.
#[derive(Clone)]
pub struct AppState {
    pub extractor: Arc<dyn MetadataExtractor>,
}

impl AppState {
    pub fn new<E>(extractor: E) -> Self
    where
        E: MetadataExtractor + 'static,
    {
        Self {
            extractor: Arc::new(extractor),
        }
    }
}
