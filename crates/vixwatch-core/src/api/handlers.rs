//! API handlers for the HTTP REST API

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::check::AlertCheck;
use crate::models::ResponsePayload;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Handler run per request
    pub check: Arc<AlertCheck>,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `ok`
    pub status: String,
    /// Crate version
    pub version: String,
}

/// Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Run one monitoring cycle; the request body is ignored
pub async fn check_vix(State(state): State<AppState>) -> (StatusCode, Json<ResponsePayload>) {
    let payload = state.check.handle().await;
    let status =
        StatusCode::from_u16(payload.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (status, Json(payload))
}
