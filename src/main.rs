use std::sync::Arc;

use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use swipe_deck::api::{create_router, AppState};
use swipe_deck::config::Config;
use swipe_deck::services::providers::MovieApiSource;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("swipe_deck=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Initialize application state
    let source = Arc::new(MovieApiSource::new(config.recommendation_api_url.clone()));
    let state = AppState::new(source, config.swipe());

    // Create the router with all routes
    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start the server
    let address = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(
        address = %address,
        recommendation_api = %config.recommendation_api_url,
        "Server running"
    );
    axum::serve(listener, app).await?;

    Ok(())
}
