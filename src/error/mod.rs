use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extractor::ExtractError;
use crate::normalize::InvalidUrl;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error.";

/// Every non-200 outcome a handler can produce.
///
/// Handlers return these; `IntoResponse` below is the only place that decides
/// status codes and bodies.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid URL")]
    InvalidUrl,

    /// The page was fetched but yielded no metadata.
    #[error("No metadata found")]
    NotFound,

    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractError),
}

impl From<InvalidUrl> for AppError {
    fn from(_: InvalidUrl) -> Self {
        AppError::InvalidUrl
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::InvalidUrl => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid URL" })),
            )
                .into_response(),
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Json(json!({ "metadata": null }))).into_response()
            }
            AppError::Extraction(e) => {
                tracing::error!(error = %e, "Metadata extraction failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": INTERNAL_ERROR_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
