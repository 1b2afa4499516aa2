use action_results::Config;
use action_results_server::{app, settings};
use anyhow::Context;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("action_results=debug,action_results_server=info,tower_http=info")),
        )
        .init();

    let config = Config::load_default()
        .unwrap_or_else(|e| {
            warn!("Failed to load config: {:#}, using defaults", e);
            Config::default()
        })
        .with_env_overrides();

    info!(
        port = config.server.port,
        web_root = %config.content.web_root_path().display(),
        routes = config.routes.len(),
        "action-results demo starting"
    );

    let settings = Arc::new(settings(&config)?);
    let app = app(settings).layer(TraceLayer::new_for_http());

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server running at http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
