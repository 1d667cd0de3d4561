//! Fruits API server
//!
//! Serves the fruit CRUD API over the storage backend selected with
//! `FRUITS_DB_TYPE`.

use std::path::Path;

use anyhow::Context;
use clap::Parser;
use fruits_persistence::Connector;
use fruits_persistence::core::FruitStore;
use fruits_persistence::fixtures::{self, PreloadOutcome};
use fruits_rest::{ServerConfig, create_app_with_config, init_logging};
use tokio::signal;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for problem in &errors {
            error!("Configuration error: {}", problem);
        }
        std::process::exit(1);
    }

    let kind = config.backend_kind();
    info!(
        port = config.port,
        host = %config.host,
        backend = %kind,
        base_path = %config.base_path,
        "Starting Fruits API server"
    );

    let connector = Connector::configure(kind, &config.connection_params());
    let store = connector
        .initialize()
        .await
        .with_context(|| format!("Failed to initialize the {} backend", kind))?;

    if let Some(data_dir) = &config.data_dir {
        preload_fixtures(store.as_ref(), data_dir, config.fixture_marker.as_deref()).await?;
    }

    let app = create_app_with_config(store, config.clone());
    serve(app, &config).await
}

/// Loads `<data_dir>/data.yaml` unless the marker says it already was.
async fn preload_fixtures(
    store: &dyn FruitStore,
    data_dir: &Path,
    marker: Option<&Path>,
) -> anyhow::Result<()> {
    let outcome = fixtures::preload(store, data_dir, marker)
        .await
        .with_context(|| format!("Failed to load fixtures from {}", data_dir.display()))?;

    match outcome {
        PreloadOutcome::Loaded(count) => info!(count, "Fixtures loaded"),
        PreloadOutcome::Skipped => info!("Fixtures already loaded, skipping"),
    }
    Ok(())
}

/// Starts the Axum HTTP server and waits for a shutdown signal.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(address = %addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}

#[cfg(not(any(
    feature = "sqlite",
    feature = "postgres",
    feature = "mysql",
    feature = "mongodb"
)))]
compile_error!("At least one database backend feature must be enabled");
