//! `recs-server`: loads the dataset, builds the similarity index, then
//! serves recommendations over HTTP.

use anyhow::{Context, Result};
use tracing::{error, info};

use server::api::{AppState, create_router};
use server::{Config, MovieRecommender};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("info,server=debug,pipeline=debug,data_loader=debug")
        .init();

    let config = Config::from_env()?;
    info!("Starting ReelRecs server with {:?}", config);

    // Build everything before accepting connections
    let data_dir = config.data_dir.clone();
    let max_features = config.max_features;
    let loaded = tokio::task::spawn_blocking(move || {
        MovieRecommender::load_with(&data_dir, max_features)
    })
    .await
    .context("Initialization task panicked")?;

    let state = match loaded {
        Ok(recommender) => {
            info!("Recommender loaded with {} movies", recommender.len());
            AppState::ready(recommender)
        }
        Err(e) => {
            error!("Failed to initialize recommender: {}", e);
            AppState::unavailable(e.to_string())
        }
    }
    .with_default_top_n(config.default_top_n);

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
