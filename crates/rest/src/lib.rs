//! # fruits-rest - Fruits CRUD API
//!
//! This crate exposes the fruit repository over HTTP with axum. The storage
//! backend is any [`FruitStore`](fruits_persistence::core::FruitStore),
//! normally the one produced by the persistence
//! [`Connector`](fruits_persistence::Connector).
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use fruits_rest::{create_app_with_config, ServerConfig};
//! use fruits_persistence::Connector;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::default();
//!     let connector = Connector::configure(config.backend_kind(), &config.connection_params());
//!     let store = connector.initialize().await?;
//!
//!     let app = create_app_with_config(store, config.clone());
//!     let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## API Endpoints
//!
//! All paths are relative to the base path (default `/api`).
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |------------|-------------|-------------|
//! | create | POST | `/fruits/add` |
//! | list | GET | `/fruits` |
//! | name search | GET | `/fruits/{name}`, `/fruits/search/{name}` |
//! | season search | GET | `/fruits/season/{season}` |
//! | delete | DELETE | `/fruits/{id}` |
//! | delete all | DELETE | `/fruits` |
//! | liveness | GET | `/health/live` |
//! | readiness | GET | `/health/ready` |
//!
//! ## Error Handling
//!
//! Errors are returned as `{"code": <status>, "message": "<text>"}`:
//!
//! | HTTP Status | Description |
//! |-------------|-------------|
//! | 400 | Malformed JSON or blank fields |
//! | 404 | Fruit not found |
//! | 500 | Storage failure |
//! | 503 | Storage unreachable (readiness) |
//!
//! ## Architecture
//!
//! - [`error`] - Error types and the JSON envelope
//! - [`config`] - Server configuration
//! - [`state`] - Application state (storage, configuration)
//! - [`handlers`] - HTTP request handlers
//! - [`routing`] - Route configuration

// Enforce documentation
#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod routing;
pub mod state;

// Re-export commonly used types
pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use fruits_persistence::core::FruitStore;
use http::HeaderValue;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the Axum application with default configuration.
///
/// For more control, use [`create_app_with_config`].
pub fn create_app<S>(storage: Arc<S>) -> Router
where
    S: FruitStore + ?Sized + 'static,
{
    create_app_with_config(storage, ServerConfig::default())
}

/// Creates the Axum application with custom configuration.
///
/// Sets up the fruit and health routes under the configured base path,
/// request tracing, the request timeout and optionally CORS.
pub fn create_app_with_config<S>(storage: Arc<S>, config: ServerConfig) -> Router
where
    S: FruitStore + ?Sized + 'static,
{
    info!(
        backend = storage.backend_name(),
        base_path = %config.base_path,
        "Creating Fruits API router"
    );

    let state = AppState::new(storage, config.clone());
    let router = routing::create_routes(state);

    // Build middleware stack
    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(config.request_timeout),
        ));

    // Add CORS if enabled
    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    router.layer(service_builder)
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let cors = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if config.cors_origins.trim() == "*" {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors.allow_origin(origins)
    }
}

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` wins when set. Otherwise `level` applies to everything, with
/// request tracing at debug and the database drivers quietened to warn.
///
/// This should be called once at application startup.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{},tower_http=debug,sqlx=warn,mongodb=warn",
            level
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
