//! Relational backend on top of the sqlx `Any` driver.

use std::fmt::Debug;
use std::path::Path;
use std::sync::Once;

use async_trait::async_trait;
use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;
use tracing::{debug, info};
use url::Url;

use super::dialect::SqlDialect;
use super::schema;
use super::storage::FruitStatements;
use crate::connector::{NetworkSettings, PoolSettings};
use crate::core::{Backend, BackendKind};
use crate::error::{BackendError, StorageResult};

static INSTALL_DRIVERS: Once = Once::new();

/// Connection configuration for a [`SqlBackend`].
#[derive(Clone)]
pub struct SqlConfig {
    /// Dialect of the target database.
    pub dialect: SqlDialect,
    /// Connection URL, credentials included.
    url: String,
    /// Loggable description of the target, without credentials.
    display_target: String,
    /// Pool sizing and timeouts.
    pub pool: PoolSettings,
    /// An in-memory SQLite database lives only as long as its connection.
    pub in_memory: bool,
}

impl Debug for SqlConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlConfig")
            .field("dialect", &self.dialect)
            .field("target", &self.display_target)
            .field("pool", &self.pool)
            .field("in_memory", &self.in_memory)
            .finish()
    }
}

impl SqlConfig {
    /// Configuration for a SQLite file, created if missing. `:memory:` opens a
    /// private in-memory database.
    pub fn sqlite(path: &Path, pool: &PoolSettings) -> Self {
        let in_memory = path.as_os_str() == ":memory:";
        let url = if in_memory {
            "sqlite::memory:".to_string()
        } else {
            format!("sqlite://{}?mode=rwc", sqlite_url_path(path))
        };
        Self {
            dialect: SqlDialect::Sqlite,
            display_target: path.display().to_string(),
            url,
            pool: pool.clone(),
            in_memory,
        }
    }

    /// Configuration for a networked server. Credentials are percent-encoded
    /// into the URL.
    pub fn network(
        dialect: SqlDialect,
        settings: &NetworkSettings,
        pool: &PoolSettings,
    ) -> StorageResult<Self> {
        let invalid = |what: &str| BackendError::connection(dialect, format!("invalid {}", what));

        let mut url = Url::parse(&format!("{}://localhost", dialect.url_scheme()))
            .map_err(|e| BackendError::connection(dialect, e))?;
        url.set_host(Some(&settings.host))
            .map_err(|e| BackendError::connection(dialect, format!("invalid host: {}", e)))?;
        url.set_port(Some(settings.port))
            .map_err(|_| invalid("port"))?;
        url.set_username(&settings.user)
            .map_err(|_| invalid("user"))?;
        if !settings.password.is_empty() {
            url.set_password(Some(&settings.password))
                .map_err(|_| invalid("password"))?;
        }
        url.set_path(&settings.database);

        Ok(Self {
            dialect,
            display_target: format!(
                "{}:{}/{}",
                settings.host, settings.port, settings.database
            ),
            url: url.into(),
            pool: pool.clone(),
            in_memory: false,
        })
    }
}

/// Percent-encoded absolute path for a `sqlite://` URL. The driver decodes
/// it again, so spaces and `?` survive.
fn sqlite_url_path(path: &Path) -> String {
    std::path::absolute(path)
        .ok()
        .and_then(|absolute| Url::from_file_path(absolute).ok())
        .map(|file_url| file_url.path().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// A relational store for fruits, shared by SQLite, PostgreSQL and MySQL.
pub struct SqlBackend {
    pub(crate) pool: AnyPool,
    pub(crate) dialect: SqlDialect,
    pub(crate) statements: FruitStatements,
    config: SqlConfig,
}

impl Debug for SqlBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlBackend")
            .field("config", &self.config)
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

impl SqlBackend {
    /// Opens a pool and verifies connectivity. The schema is not touched; call
    /// [`Backend::initialize`] for that.
    pub async fn connect(config: SqlConfig) -> StorageResult<Self> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        let dialect = config.dialect;
        let mut options = AnyPoolOptions::new().acquire_timeout(config.pool.connect_timeout());

        options = if config.in_memory {
            // One connection that is never recycled keeps the database alive.
            options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            options.max_connections(config.pool.max_connections.max(1))
        };

        debug!(dialect = %dialect, target = %config.display_target, "Connecting");
        let pool = options
            .connect(&config.url)
            .await
            .map_err(|e| BackendError::connection(dialect, e))?;

        info!(
            dialect = %dialect,
            target = %config.display_target,
            max_connections = config.pool.max_connections,
            "Connected to relational backend"
        );

        Ok(Self {
            pool,
            dialect,
            statements: FruitStatements::for_dialect(dialect),
            config,
        })
    }

    /// Returns the dialect of this backend.
    pub fn dialect(&self) -> SqlDialect {
        self.dialect
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Closes every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl Backend for SqlBackend {
    fn kind(&self) -> BackendKind {
        self.dialect.kind()
    }

    fn name(&self) -> &'static str {
        self.dialect.name()
    }

    async fn health_check(&self) -> Result<(), BackendError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| BackendError::unavailable(self.dialect, e))?;
        Ok(())
    }

    async fn initialize(&self) -> Result<(), BackendError> {
        schema::initialize_schema(&self.pool, self.dialect).await
    }
}
