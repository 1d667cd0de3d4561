//! Backend connector.
//!
//! The [`Connector`] owns the one live pool or client for the process. It is
//! configured for exactly one [`BackendKind`], opens the connection and
//! prepares the schema on first use, and answers readiness probes.
//!
//! Initialization runs at most once even when first requested concurrently
//! from several tasks. A failed attempt leaves the connector uninitialized so
//! a later call can retry.
//!
//! # Example
//!
//! ```no_run
//! use fruits_persistence::connector::{ConnectionParams, Connector};
//! use fruits_persistence::core::BackendKind;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connector = Connector::configure(
//!     BackendKind::parse_lenient("sqlite"),
//!     &ConnectionParams::sqlite("./fruits.db"),
//! );
//! let store = connector.initialize().await?;
//! let fruits = store.list_all().await?;
//! connector.health_check().await?;
//! # Ok(())
//! # }
//! ```

mod config;

use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

pub use config::{BackendSettings, ConnectionParams, MongoSettings, NetworkSettings, PoolSettings};

use crate::core::{BackendKind, FruitStore};
use crate::error::{BackendError, StorageError, StorageResult};

/// Owns the process-wide storage handle for one configured backend.
#[derive(Debug)]
pub struct Connector {
    settings: BackendSettings,
    pool: PoolSettings,
    store: OnceCell<Arc<dyn FruitStore>>,
}

impl Connector {
    /// Selects the settings for `kind` out of `params`.
    ///
    /// Nothing is opened until [`initialize`](Self::initialize) is called.
    pub fn configure(kind: BackendKind, params: &ConnectionParams) -> Self {
        let settings = params.settings_for(kind);
        debug!(backend = %kind, settings = ?settings, "Configured storage connector");
        Self {
            settings,
            pool: params.pool.clone(),
            store: OnceCell::new(),
        }
    }

    /// Returns the configured backend kind.
    pub fn kind(&self) -> BackendKind {
        self.settings.kind()
    }

    /// Returns the configured backend settings.
    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    /// Returns true once [`initialize`](Self::initialize) has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.store.initialized()
    }

    /// Returns the live store, if initialized.
    pub fn store(&self) -> Option<Arc<dyn FruitStore>> {
        self.store.get().cloned()
    }

    /// Opens the backend and prepares its schema, once.
    ///
    /// Later calls return the same handle without touching the database.
    ///
    /// # Errors
    ///
    /// * `BackendError::ConnectionFailed` - The database cannot be reached or opened
    /// * `BackendError::SchemaFailed` - The `fruits` table or collection cannot be created
    pub async fn initialize(&self) -> StorageResult<Arc<dyn FruitStore>> {
        self.store
            .get_or_try_init(|| self.open())
            .await
            .map(Arc::clone)
    }

    /// Runs a lightweight round-trip against the backend.
    pub async fn health_check(&self) -> StorageResult<()> {
        match self.store.get() {
            Some(store) => store.health_check().await.map_err(StorageError::from),
            None => Err(BackendError::unavailable(self.kind(), "connector not initialized").into()),
        }
    }

    async fn open(&self) -> StorageResult<Arc<dyn FruitStore>> {
        info!(backend = %self.kind(), "Initializing storage backend");

        let store = match &self.settings {
            BackendSettings::Sqlite { path } => open_sqlite(path, &self.pool).await?,
            BackendSettings::Postgres(settings) => open_postgres(settings, &self.pool).await?,
            BackendSettings::MySql(settings) => open_mysql(settings, &self.pool).await?,
            BackendSettings::MongoDB(settings) => open_mongodb(settings, &self.pool).await?,
        };

        store.initialize().await?;

        info!(backend = store.name(), "Storage backend ready");
        Ok(store)
    }
}

#[allow(dead_code)]
fn not_compiled(kind: BackendKind, feature: &str) -> StorageError {
    BackendError::connection(
        kind,
        format!(
            "{} support is not compiled in; rebuild with the `{}` feature",
            kind, feature
        ),
    )
    .into()
}

#[cfg(feature = "sqlite")]
async fn open_sqlite(
    path: &std::path::Path,
    pool: &PoolSettings,
) -> StorageResult<Arc<dyn FruitStore>> {
    use crate::backends::sql::{SqlBackend, SqlConfig};

    let backend = SqlBackend::connect(SqlConfig::sqlite(path, pool)).await?;
    Ok(Arc::new(backend))
}

#[cfg(not(feature = "sqlite"))]
async fn open_sqlite(
    _path: &std::path::Path,
    _pool: &PoolSettings,
) -> StorageResult<Arc<dyn FruitStore>> {
    Err(not_compiled(BackendKind::Sqlite, "sqlite"))
}

#[cfg(feature = "postgres")]
async fn open_postgres(
    settings: &NetworkSettings,
    pool: &PoolSettings,
) -> StorageResult<Arc<dyn FruitStore>> {
    use crate::backends::sql::{SqlBackend, SqlConfig, SqlDialect};

    let config = SqlConfig::network(SqlDialect::Postgres, settings, pool)?;
    Ok(Arc::new(SqlBackend::connect(config).await?))
}

#[cfg(not(feature = "postgres"))]
async fn open_postgres(
    _settings: &NetworkSettings,
    _pool: &PoolSettings,
) -> StorageResult<Arc<dyn FruitStore>> {
    Err(not_compiled(BackendKind::Postgres, "postgres"))
}

#[cfg(feature = "mysql")]
async fn open_mysql(
    settings: &NetworkSettings,
    pool: &PoolSettings,
) -> StorageResult<Arc<dyn FruitStore>> {
    use crate::backends::sql::{SqlBackend, SqlConfig, SqlDialect};

    let config = SqlConfig::network(SqlDialect::MySql, settings, pool)?;
    Ok(Arc::new(SqlBackend::connect(config).await?))
}

#[cfg(not(feature = "mysql"))]
async fn open_mysql(
    _settings: &NetworkSettings,
    _pool: &PoolSettings,
) -> StorageResult<Arc<dyn FruitStore>> {
    Err(not_compiled(BackendKind::MySql, "mysql"))
}

#[cfg(feature = "mongodb")]
async fn open_mongodb(
    settings: &MongoSettings,
    pool: &PoolSettings,
) -> StorageResult<Arc<dyn FruitStore>> {
    use crate::backends::mongodb::MongoBackend;

    Ok(Arc::new(MongoBackend::connect(settings, pool).await?))
}

#[cfg(not(feature = "mongodb"))]
async fn open_mongodb(
    _settings: &MongoSettings,
    _pool: &PoolSettings,
) -> StorageResult<Arc<dyn FruitStore>> {
    Err(not_compiled(BackendKind::MongoDB, "mongodb"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check_before_initialize_is_unavailable() {
        let connector = Connector::configure(BackendKind::Sqlite, &ConnectionParams::default());
        assert!(!connector.is_initialized());
        assert!(connector.store().is_none());

        let err = connector.health_check().await.unwrap_err();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_configure_selects_kind() {
        let params = ConnectionParams::default();
        let connector = Connector::configure(BackendKind::Postgres, &params);
        assert_eq!(connector.kind(), BackendKind::Postgres);
        assert!(matches!(
            connector.settings(),
            BackendSettings::Postgres(settings) if settings.port == 5432
        ));
    }

    #[cfg(feature = "sqlite")]
    #[tokio::test]
    async fn test_in_memory_sqlite_initializes_once() {
        let connector =
            Connector::configure(BackendKind::Sqlite, &ConnectionParams::sqlite(":memory:"));

        let first = connector.initialize().await.unwrap();
        let second = connector.initialize().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(connector.is_initialized());
        connector.health_check().await.unwrap();
    }
}
