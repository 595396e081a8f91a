//! REST API implementation
//!
//! Exposes the check as an HTTP endpoint for schedulers that trigger by URL.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;

use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::check::AlertCheck;
use crate::error::Result;

/// HTTP API server
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server
    pub fn new(check: Arc<AlertCheck>) -> Self {
        Self {
            state: AppState { check },
        }
    }

    /// Start the HTTP server and run until Ctrl+C
    pub async fn serve(self, addr: &str) -> Result<()> {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        let app = create_router(self.state)
            .layer(TraceLayer::new_for_http())
            .layer(cors);

        let listener = TcpListener::bind(addr).await?;

        info!("HTTP server listening on {}", addr);

        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = tokio::signal::ctrl_c().await;
                info!("Ctrl+C received, shutting down...");
            })
            .await?;

        Ok(())
    }
}
