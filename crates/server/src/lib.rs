//! Server crate for the ReelRecs recommendation engine.
//!
//! This crate contains the query service (`MovieRecommender`) and the HTTP
//! layer that exposes it, plus the configuration used by `recs-server`.

pub mod api;
pub mod config;
pub mod error;
pub mod recommender;

pub use config::Config;
pub use error::{ApiError, InitError, RecommendError};
pub use recommender::{DEFAULT_TOP_N, MAX_TOP_N, MovieRecommender, Recommendation};
