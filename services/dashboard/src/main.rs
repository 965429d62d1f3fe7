mod config;
mod html;
mod routes;
mod sample_source;
mod state;

use std::sync::Arc;

use anyhow::{Context, Result};
use polarity::SentimentIntensityAnalyzer;
use tracing::info;

use crate::config::AppConfig;
use crate::sample_source::HttpSampleSource;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;

    let sample = HttpSampleSource::new(cfg.sample_url.clone());
    let scorer = SentimentIntensityAnalyzer::new();
    info!(sample_url = %cfg.sample_url, "scorer ready");

    let app_state = Arc::new(AppState::new(cfg.clone(), Arc::new(sample), Arc::new(scorer)));
    let app = routes::router(app_state);

    let addr = &cfg.bind_addr;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("dashboard listening on http://{addr}");
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
