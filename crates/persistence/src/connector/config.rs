//! Connection parameters for the supported backends.
//!
//! [`ConnectionParams`] carries everything any backend might need. The
//! connector picks the relevant part into a [`BackendSettings`] when it is
//! configured for one [`BackendKind`].

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::BackendKind;

/// Pool sizing and timeouts shared by every backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolSettings {
    /// Maximum number of pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Connection and acquire timeout in seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_max_connections() -> u32 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: default_max_connections(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl PoolSettings {
    /// Returns the connect timeout as a [`Duration`].
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// Host, port and credentials for a networked SQL server.
#[derive(Clone, Serialize, Deserialize)]
pub struct NetworkSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl NetworkSettings {
    /// Defaults for a local PostgreSQL server.
    pub fn postgres_defaults() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            user: "demo".to_string(),
            password: "pa55Word!".to_string(),
            database: "demodb".to_string(),
        }
    }

    /// Defaults for a local MySQL server.
    pub fn mysql_defaults() -> Self {
        Self {
            port: 3306,
            ..Self::postgres_defaults()
        }
    }
}

// Keeps the password out of logs.
impl fmt::Debug for NetworkSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NetworkSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

/// MongoDB connection URI plus the database and collection to use.
#[derive(Clone, Serialize, Deserialize)]
pub struct MongoSettings {
    pub uri: String,
    pub database: String,
    pub collection: String,
}

impl Default for MongoSettings {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            database: "demodb".to_string(),
            collection: "fruits".to_string(),
        }
    }
}

// The URI may embed credentials.
impl fmt::Debug for MongoSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MongoSettings")
            .field("uri", &"***")
            .field("database", &self.database)
            .field("collection", &self.collection)
            .finish()
    }
}

/// Every parameter any backend might need, as collected from configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionParams {
    /// SQLite database file, or `:memory:`.
    pub sqlite_path: PathBuf,
    pub postgres: NetworkSettings,
    pub mysql: NetworkSettings,
    pub mongodb: MongoSettings,
    #[serde(default)]
    pub pool: PoolSettings,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            sqlite_path: PathBuf::from("fruits.db"),
            postgres: NetworkSettings::postgres_defaults(),
            mysql: NetworkSettings::mysql_defaults(),
            mongodb: MongoSettings::default(),
            pool: PoolSettings::default(),
        }
    }
}

impl ConnectionParams {
    /// Parameters for a SQLite database at `path`.
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        Self {
            sqlite_path: path.into(),
            ..Default::default()
        }
    }

    /// Resolves the settings for a single backend kind.
    pub fn settings_for(&self, kind: BackendKind) -> BackendSettings {
        match kind {
            BackendKind::Sqlite => BackendSettings::Sqlite {
                path: self.sqlite_path.clone(),
            },
            BackendKind::Postgres => BackendSettings::Postgres(self.postgres.clone()),
            BackendKind::MySql => BackendSettings::MySql(self.mysql.clone()),
            BackendKind::MongoDB => BackendSettings::MongoDB(self.mongodb.clone()),
        }
    }
}

/// The settings of the one backend a connector is configured for.
#[derive(Debug, Clone)]
pub enum BackendSettings {
    Sqlite { path: PathBuf },
    Postgres(NetworkSettings),
    MySql(NetworkSettings),
    MongoDB(MongoSettings),
}

impl BackendSettings {
    /// Returns the backend kind these settings belong to.
    pub fn kind(&self) -> BackendKind {
        match self {
            BackendSettings::Sqlite { .. } => BackendKind::Sqlite,
            BackendSettings::Postgres(_) => BackendKind::Postgres,
            BackendSettings::MySql(_) => BackendKind::MySql,
            BackendSettings::MongoDB(_) => BackendKind::MongoDB,
        }
    }
}
