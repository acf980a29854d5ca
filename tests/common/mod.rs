// Each integration test file is a separate binary; helpers not used in every
// binary would otherwise trigger dead_code warnings from clippy.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    async_trait,
    body::Body,
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use unfurl_server::{
    extractor::{ExtractError, ExtractOutcome, MetadataExtractor},
    models::{ImageCandidate, MetaTags, OpenGraph, RawPageMetadata},
    router::create_router,
    state::AppState,
};

// ── Stub extractor ───────────────────────────────────────────────────────────

/// What the stub answers with on every call.
#[derive(Clone)]
pub enum StubReply {
    Found(RawPageMetadata),
    NotFound,
    Fail,
}

/// Extractor that never touches the network and records every URL it sees.
#[derive(Clone)]
pub struct StubExtractor {
    reply: StubReply,
    calls: Arc<Mutex<Vec<String>>>,
}

impl StubExtractor {
    pub fn new(reply: StubReply) -> Self {
        Self {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn found(raw: RawPageMetadata) -> Self {
        Self::new(StubReply::Found(raw))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetadataExtractor for StubExtractor {
    async fn extract(&self, url: &str) -> ExtractOutcome {
        self.calls.lock().unwrap().push(url.to_string());
        match &self.reply {
            StubReply::Found(raw) => ExtractOutcome::Found(raw.clone()),
            StubReply::NotFound => ExtractOutcome::NotFound,
            StubReply::Fail => {
                ExtractOutcome::Failed(ExtractError::Blocked("db.internal.secret".into()))
            }
        }
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn og_only(title: &str) -> RawPageMetadata {
    RawPageMetadata {
        images: vec![],
        og: OpenGraph {
            title: Some(title.into()),
            ..Default::default()
        },
        meta: MetaTags::default(),
    }
}

pub fn full_page() -> RawPageMetadata {
    RawPageMetadata {
        images: vec![
            ImageCandidate::new("https://example.com/first.png"),
            ImageCandidate::new("https://example.com/second.png"),
        ],
        og: OpenGraph {
            title: Some("OG Title".into()),
            description: Some("OG Description".into()),
            image: Some("https://example.com/og.png".into()),
            site_name: Some("Example".into()),
        },
        meta: MetaTags {
            title: Some("Meta Title".into()),
            description: Some("Meta Description".into()),
        },
    }
}

/// Build the full application router around `extractor`.
pub fn create_test_app(extractor: StubExtractor) -> Router {
    create_router(AppState::new(extractor), Duration::from_secs(5))
}

// ── Request helpers ──────────────────────────────────────────────────────────

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    let req = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = send(app, req).await;
    (status, body)
}

/// Send `req` and return status, headers and the JSON body (`Null` if the
/// body is empty or not JSON).
pub async fn send(app: Router, req: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, json)
}
