//! Application state for the Fruits API.
//!
//! Every handler receives the storage backend and the server configuration
//! through axum's `State` extractor.

use std::sync::Arc;

use fruits_persistence::core::FruitStore;

use crate::config::ServerConfig;

/// Shared application state for the REST API.
///
/// `S` is usually `dyn FruitStore`, as returned by the connector, but any
/// concrete store works too.
///
/// # Example
///
/// ```rust,ignore
/// use fruits_rest::{AppState, ServerConfig};
/// use fruits_persistence::{ConnectionParams, Connector};
/// use fruits_persistence::core::BackendKind;
///
/// let connector = Connector::configure(BackendKind::Sqlite, &ConnectionParams::sqlite(":memory:"));
/// let store = connector.initialize().await?;
/// let state = AppState::new(store, ServerConfig::default());
/// ```
pub struct AppState<S: ?Sized> {
    /// The storage backend.
    storage: Arc<S>,

    /// Server configuration.
    config: Arc<ServerConfig>,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S: ?Sized> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: FruitStore + ?Sized> AppState<S> {
    /// Creates a new AppState with the given storage and configuration.
    pub fn new(storage: Arc<S>, config: ServerConfig) -> Self {
        Self {
            storage,
            config: Arc::new(config),
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns a clone of the storage Arc.
    pub fn storage_arc(&self) -> Arc<S> {
        Arc::clone(&self.storage)
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
