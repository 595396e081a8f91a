//! API routes

use axum::{routing::get, Router};

use super::handlers::{self, AppState};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health))

        // Monitoring cycle
        .route(
            "/api/check-vix",
            get(handlers::check_vix).post(handlers::check_vix),
        )

        .with_state(state)
}
