use std::sync::Arc;

use crate::error::RecommendError;
use crate::recommender::{DEFAULT_TOP_N, MovieRecommender};

/// Outcome of startup initialization
#[derive(Debug, Clone)]
pub enum RecommenderHandle {
    Ready(Arc<MovieRecommender>),
    /// Initialization failed; every query answers 503
    Unavailable { reason: String },
}

impl RecommenderHandle {
    /// The recommender, or [`RecommendError::Unavailable`]
    pub fn get(&self) -> Result<Arc<MovieRecommender>, RecommendError> {
        match self {
            RecommenderHandle::Ready(recommender) => Ok(Arc::clone(recommender)),
            RecommenderHandle::Unavailable { .. } => Err(RecommendError::Unavailable),
        }
    }
}

/// Shared application state, read-only after startup
#[derive(Debug, Clone)]
pub struct AppState {
    pub recommender: RecommenderHandle,
    /// `top_n` used when a request omits it
    pub default_top_n: usize,
}

impl AppState {
    pub fn ready(recommender: MovieRecommender) -> Self {
        Self {
            recommender: RecommenderHandle::Ready(Arc::new(recommender)),
            default_top_n: DEFAULT_TOP_N,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            recommender: RecommenderHandle::Unavailable {
                reason: reason.into(),
            },
            default_top_n: DEFAULT_TOP_N,
        }
    }

    pub fn with_default_top_n(mut self, default_top_n: usize) -> Self {
        self.default_top_n = default_top_n;
        self
    }
}
