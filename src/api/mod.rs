//! Moodlens REST API
//!
//! HTTP API layer for Moodlens, built with Axum.
//!
//! # Endpoints
//!
//! ## Entries
//! - `POST /api/v1/users/:user_id/entries` - Create or replace an entry
//! - `GET /api/v1/users/:user_id/entries` - Entries in a date window
//! - `GET /api/v1/users/:user_id/entries/today` - Today's entry
//! - `DELETE /api/v1/users/:user_id/entries/:date` - Delete an entry
//!
//! ## Analysis
//! - `GET /api/v1/users/:user_id/analysis/patterns` - Rule-based analysis
//! - `GET /api/v1/users/:user_id/analysis/summary` - Analysis with external summary
//! - `GET /api/v1/users/:user_id/analysis/daily-insight` - Daily insight
//! - `GET /api/v1/users/:user_id/stats` - Dashboard statistics
//!
//! ## Health
//! - `GET /health/live` - Liveness probe
//! - `GET /health/ready` - Readiness probe
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use moodlens::analysis::PatternAnalysisEngine;
//! use moodlens::api::{serve, ApiConfig, AppState};
//! use moodlens::entries::MemoryEntryStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ApiConfig::default();
//!     let state = AppState::new(
//!         Arc::new(MemoryEntryStore::new()),
//!         Arc::new(PatternAnalysisEngine::default()),
//!         config.clone(),
//!     );
//!     serve(state, &config).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use state::{ApiConfig, AppState};

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let user_routes = Router::new()
        // Entry routes
        .route(
            "/entries",
            post(routes::entries::create_entry).get(routes::entries::list_entries),
        )
        .route("/entries/today", get(routes::entries::today_entry))
        .route("/entries/:date", delete(routes::entries::delete_entry))
        // Analysis routes
        .route("/analysis/patterns", get(routes::analysis::patterns))
        .route("/analysis/summary", get(routes::analysis::summary))
        .route("/analysis/daily-insight", get(routes::analysis::daily_insight))
        .route("/stats", get(routes::analysis::stats));

    let api_routes = Router::new()
        .nest("/users/:user_id", user_routes)
        .layer(DefaultBodyLimit::max(state.config.max_body_size));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.config.cors_origins);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .nest("/api/v1", api_routes)
        .nest("/health", health_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Permissive when no origins are configured
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    if allowed.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(allowed)
            .allow_methods(tower_http::cors::Any)
            .allow_headers(tower_http::cors::Any)
    }
}

/// Start the API server
pub async fn serve(state: AppState, config: &ApiConfig) -> Result<(), ApiError> {
    let router = build_router(state);

    let addr = config.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("Moodlens API listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("Moodlens API shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
