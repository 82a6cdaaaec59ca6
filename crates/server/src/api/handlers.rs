use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::error::{ApiError, ApiResult, RecommendError};
use crate::recommender::MAX_TOP_N;

use super::{AppState, RecommenderHandle};

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct RecommendParams {
    pub title: Option<String>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RecommendResponse {
    pub recommended: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub movies: usize,
    /// Why initialization failed, when unavailable
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

// Handlers

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": "🎬 ReelRecs API is up and running!"
    }))
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let response = match &state.recommender {
        RecommenderHandle::Ready(recommender) => HealthResponse {
            status: "ok".to_string(),
            movies: recommender.len(),
            reason: None,
        },
        RecommenderHandle::Unavailable { reason } => HealthResponse {
            status: "unavailable".to_string(),
            movies: 0,
            reason: Some(reason.clone()),
        },
    };
    Json(response)
}

pub async fn recommend(
    State(state): State<AppState>,
    params: Result<Query<RecommendParams>, QueryRejection>,
) -> ApiResult<Json<RecommendResponse>> {
    // After a failed startup every query gets the same reply
    let recommender = state.recommender.get()?;

    let Query(params) =
        params.map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;

    let title = params
        .title
        .ok_or_else(|| ApiError::InvalidInput("Missing required parameter 'title'".to_string()))?;

    let top_n = params.top_n.unwrap_or(state.default_top_n);
    if !(1..=MAX_TOP_N).contains(&top_n) {
        return Err(ApiError::InvalidInput(format!(
            "'top_n' must be between 1 and {}",
            MAX_TOP_N
        )));
    }

    // The row scan and sort are CPU-bound
    let query = title.clone();
    let result = tokio::task::spawn_blocking(move || recommender.recommend(&query, top_n))
        .await
        .map_err(|e| RecommendError::Internal(format!("Recommendation task failed: {}", e)))?;

    match result {
        Ok(recommended) => {
            info!("Recommended {} movies for '{}'", recommended.len(), title);
            Ok(Json(RecommendResponse { recommended }))
        }
        Err(e) => {
            warn!("Recommendation for '{}' failed: {}", title, e);
            Err(e.into())
        }
    }
}
