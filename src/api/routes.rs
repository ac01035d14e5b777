use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        // Deck lifecycle
        .route(
            "/deck",
            get(handlers::get_deck)
                .post(handlers::start_deck)
                .delete(handlers::reset_deck),
        )
        .route("/deck/recommend", post(handlers::recommend))
        // Gestures
        .route("/deck/cards/:card_id/pointer", post(handlers::pointer_event))
        // Results
        .route("/deck/log", get(handlers::get_log))
        .route("/deck/summary", get(handlers::get_summary))
}
