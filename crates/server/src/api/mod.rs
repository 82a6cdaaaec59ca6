//! HTTP layer: axum router, shared state and handlers.

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppState, RecommenderHandle};
