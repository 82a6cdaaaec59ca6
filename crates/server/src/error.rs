//! Error types for the query service and its HTTP layer.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use data_loader::DataLoadError;
use pipeline::IndexBuildError;
use serde_json::json;
use thiserror::Error;

/// Startup failure: no recommender could be constructed
#[derive(Error, Debug)]
pub enum InitError {
    #[error("Failed to load dataset: {0}")]
    DataLoad(#[from] DataLoadError),

    #[error("Failed to build similarity index: {0}")]
    IndexBuild(#[from] IndexBuildError),
}

/// Per-query failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecommendError {
    /// No movie carries this title (case-insensitive)
    #[error("Movie '{title}' not found")]
    NotFound { title: String },

    /// Startup failed, so there is nothing to query
    #[error("Recommender system not available")]
    Unavailable,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Errors returned by HTTP handlers
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Recommend(#[from] RecommendError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Recommend(RecommendError::NotFound { .. }) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::Recommend(RecommendError::Unavailable) => {
                (StatusCode::SERVICE_UNAVAILABLE, self.to_string())
            }
            ApiError::Recommend(RecommendError::Internal(detail)) => {
                tracing::error!("Request failed: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        let body = Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
