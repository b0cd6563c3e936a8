//! # Timetable API
//!
//! HTTP front end for the timetable engine: conflict checks, generation,
//! manual session edits and the publish/rollback lifecycle.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Translate requests into engine calls
//! - **Middleware**: Error mapping shared by every handler
//! - **Config**: Environment-driven server settings
//!
//! The API only talks to [`TimetableEngine`]; which storage backs the engine
//! is decided by the binary that starts the server.

/// Configuration module for API settings
pub mod config;
/// Request handlers
pub mod handlers;
/// Error mapping
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{Router, http::HeaderValue};
use eyre::Result;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;
use unitime_core::TimetableEngine;

/// Shared application state that is accessible to all request handlers
pub struct ApiState {
    pub engine: TimetableEngine,
    /// Upper bound on one generation run.
    pub generation_timeout: Duration,
}

impl ApiState {
    pub fn new(engine: TimetableEngine, generation_timeout: Duration) -> Arc<Self> {
        Arc::new(Self {
            engine,
            generation_timeout,
        })
    }
}

/// Builds the router with every route and request tracing, without the
/// server-level CORS and timeout layers.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Timetable endpoints
        .merge(routes::timetable::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::AUTHORIZATION,
            axum::http::header::ACCEPT,
        ])
        .allow_origin(allowed)
        .allow_credentials(true)
}

/// Starts the API server with the provided configuration and engine
pub async fn start_server(config: config::ApiConfig, engine: TimetableEngine) -> Result<()> {
    // Initialize tracing for logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let state = ApiState::new(engine, config.generation_timeout());
    let router = app(state);

    // Apply CORS configuration if origins are specified
    let router = match &config.cors_origins {
        Some(origins) => router.layer(cors_layer(origins)),
        None => router,
    };

    // Add request timeout middleware
    let router = router.layer(ServiceBuilder::new().layer(TimeoutLayer::new(config.request_timeout())));

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
