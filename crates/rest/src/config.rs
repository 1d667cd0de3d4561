//! Server configuration for the Fruits API.
//!
//! Every setting can be given as a command line flag or an environment
//! variable. Flags win over the environment.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HTTP_LISTEN_HOST` | 0.0.0.0 | Host to bind |
//! | `HTTP_LISTEN_PORT` | 8080 | Server port |
//! | `LOG_LEVEL` | info | Log level |
//! | `FRUITS_API_BASE_PATH` | /api | Prefix for every route |
//! | `FRUITS_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `FRUITS_ENABLE_CORS` | true | Enable CORS |
//! | `FRUITS_CORS_ORIGINS` | * | Allowed origins |
//! | `FRUITS_DB_TYPE` | sqlite | sqlite, postgres, mysql or mongodb |
//! | `FRUITS_DB_FILE` | fruits.db | SQLite database file |
//! | `POSTGRES_HOST` .. `POSTGRES_DB` | localhost:5432 demo/demodb | PostgreSQL server |
//! | `MYSQL_HOST` .. `MYSQL_DB` | localhost:3306 demo/demodb | MySQL server |
//! | `MONGODB_URI` | mongodb://localhost:27017 | MongoDB connection string |
//! | `MONGODB_DATABASE` | demodb | MongoDB database |
//! | `MONGODB_COLLECTION` | fruits | MongoDB collection |
//! | `FRUITS_DB_MAX_CONNECTIONS` | 10 | Pool size |
//! | `FRUITS_DB_TIMEOUT` | 5 | Connect timeout (seconds) |
//! | `FRUITS_DATA_DIR` | | Directory holding `data.yaml` to preload |
//! | `FRUITS_FIXTURE_MARKER` | | Marker file that suppresses a second preload |
//!
//! # Example
//!
//! ```rust
//! use fruits_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     db_type: "postgres".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::path::PathBuf;

use clap::Parser;
use fruits_persistence::connector::{
    ConnectionParams, MongoSettings, NetworkSettings, PoolSettings,
};
use fruits_persistence::core::BackendKind;

/// Server configuration for the Fruits API.
#[derive(Debug, Clone, Parser)]
#[command(name = "fruits-server")]
#[command(about = "Fruits CRUD API over SQLite, PostgreSQL, MySQL or MongoDB")]
pub struct ServerConfig {
    /// Host address to bind to.
    #[arg(long, env = "HTTP_LISTEN_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, env = "HTTP_LISTEN_PORT", default_value = "8080")]
    pub port: u16,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Path prefix for every route. Empty mounts the routes at the root.
    #[arg(long, env = "FRUITS_API_BASE_PATH", default_value = "/api")]
    pub base_path: String,

    /// Request timeout in seconds.
    #[arg(long, env = "FRUITS_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "FRUITS_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "FRUITS_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Storage backend. Unknown values fall back to sqlite.
    #[arg(long, env = "FRUITS_DB_TYPE", default_value = "sqlite")]
    pub db_type: String,

    /// SQLite database file (`:memory:` for a private in-memory database).
    #[arg(long, env = "FRUITS_DB_FILE", default_value = "fruits.db")]
    pub db_file: PathBuf,

    /// PostgreSQL host.
    #[arg(long, env = "POSTGRES_HOST", default_value = "localhost")]
    pub postgres_host: String,

    /// PostgreSQL port.
    #[arg(long, env = "POSTGRES_PORT", default_value = "5432")]
    pub postgres_port: u16,

    /// PostgreSQL user.
    #[arg(long, env = "POSTGRES_USER", default_value = "demo")]
    pub postgres_user: String,

    /// PostgreSQL password.
    #[arg(long, env = "POSTGRES_PASSWORD", default_value = "pa55Word!", hide_env_values = true)]
    pub postgres_password: String,

    /// PostgreSQL database.
    #[arg(long, env = "POSTGRES_DB", default_value = "demodb")]
    pub postgres_db: String,

    /// MySQL host.
    #[arg(long, env = "MYSQL_HOST", default_value = "localhost")]
    pub mysql_host: String,

    /// MySQL port.
    #[arg(long, env = "MYSQL_PORT", default_value = "3306")]
    pub mysql_port: u16,

    /// MySQL user.
    #[arg(long, env = "MYSQL_USER", default_value = "demo")]
    pub mysql_user: String,

    /// MySQL password.
    #[arg(long, env = "MYSQL_PASSWORD", default_value = "pa55Word!", hide_env_values = true)]
    pub mysql_password: String,

    /// MySQL database.
    #[arg(long, env = "MYSQL_DB", default_value = "demodb")]
    pub mysql_db: String,

    /// MongoDB connection string.
    #[arg(long, env = "MONGODB_URI", default_value = "mongodb://localhost:27017", hide_env_values = true)]
    pub mongodb_uri: String,

    /// MongoDB database.
    #[arg(long, env = "MONGODB_DATABASE", default_value = "demodb")]
    pub mongodb_database: String,

    /// MongoDB collection.
    #[arg(long, env = "MONGODB_COLLECTION", default_value = "fruits")]
    pub mongodb_collection: String,

    /// Maximum pooled connections.
    #[arg(long, env = "FRUITS_DB_MAX_CONNECTIONS", default_value = "10")]
    pub db_max_connections: u32,

    /// Connect and acquire timeout in seconds.
    #[arg(long, env = "FRUITS_DB_TIMEOUT", default_value = "5")]
    pub db_timeout: u64,

    /// Directory containing `data.yaml` to load at startup.
    #[arg(long, env = "FRUITS_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Marker file written after a successful preload. Defaults to
    /// `<data-dir>/.loaded`.
    #[arg(long, env = "FRUITS_FIXTURE_MARKER")]
    pub fixture_marker: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let postgres = NetworkSettings::postgres_defaults();
        let mysql = NetworkSettings::mysql_defaults();
        let mongodb = MongoSettings::default();
        let pool = PoolSettings::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            log_level: "info".to_string(),
            base_path: "/api".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            db_type: "sqlite".to_string(),
            db_file: PathBuf::from("fruits.db"),
            postgres_host: postgres.host,
            postgres_port: postgres.port,
            postgres_user: postgres.user,
            postgres_password: postgres.password,
            postgres_db: postgres.database,
            mysql_host: mysql.host,
            mysql_port: mysql.port,
            mysql_user: mysql.user,
            mysql_password: mysql.password,
            mysql_db: mysql.database,
            mongodb_uri: mongodb.uri,
            mongodb_database: mongodb.database,
            mongodb_collection: mongodb.collection,
            db_max_connections: pool.max_connections,
            db_timeout: pool.connect_timeout_secs,
            data_dir: None,
            fixture_marker: None,
        }
    }
}

impl ServerConfig {
    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The base path without a trailing slash. Empty means the root.
    pub fn normalized_base_path(&self) -> &str {
        self.base_path.trim_end_matches('/')
    }

    /// The configured backend, falling back to SQLite for unknown names.
    pub fn backend_kind(&self) -> BackendKind {
        BackendKind::parse_lenient(&self.db_type)
    }

    /// Collects the persistence settings for every backend.
    pub fn connection_params(&self) -> ConnectionParams {
        ConnectionParams {
            sqlite_path: self.db_file.clone(),
            postgres: NetworkSettings {
                host: self.postgres_host.clone(),
                port: self.postgres_port,
                user: self.postgres_user.clone(),
                password: self.postgres_password.clone(),
                database: self.postgres_db.clone(),
            },
            mysql: NetworkSettings {
                host: self.mysql_host.clone(),
                port: self.mysql_port,
                user: self.mysql_user.clone(),
                password: self.mysql_password.clone(),
                database: self.mysql_db.clone(),
            },
            mongodb: MongoSettings {
                uri: self.mongodb_uri.clone(),
                database: self.mongodb_database.clone(),
                collection: self.mongodb_collection.clone(),
            },
            pool: PoolSettings {
                max_connections: self.db_max_connections,
                connect_timeout_secs: self.db_timeout,
            },
        }
    }

    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.db_timeout == 0 {
            errors.push("Database timeout cannot be 0".to_string());
        }

        if self.db_max_connections == 0 {
            errors.push("Database max connections cannot be 0".to_string());
        }

        if !self.base_path.is_empty() && !self.base_path.starts_with('/') {
            errors.push(format!(
                "Base path must start with '/': {:?}",
                self.base_path
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// This uses ephemeral port 0, a private in-memory SQLite database and
    /// disables CORS.
    pub fn for_testing() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0,
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            db_file: PathBuf::from(":memory:"),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.base_path, "/api");
        assert_eq!(config.backend_kind(), BackendKind::Sqlite);
        assert!(config.enable_cors);
    }

    #[test]
    fn test_default_matches_cli_defaults() {
        let parsed = ServerConfig::try_parse_from(["fruits-server"]).unwrap();
        let defaults = ServerConfig::default();
        assert_eq!(parsed.base_path, defaults.base_path);
        assert_eq!(parsed.db_file, defaults.db_file);
        assert_eq!(parsed.postgres_port, defaults.postgres_port);
        assert_eq!(parsed.mysql_port, defaults.mysql_port);
        assert_eq!(parsed.mongodb_collection, defaults.mongodb_collection);
        assert_eq!(parsed.db_max_connections, defaults.db_max_connections);
    }

    #[test]
    fn test_parse_flags() {
        let config = ServerConfig::try_parse_from([
            "fruits-server",
            "--port",
            "9090",
            "--db-type",
            "mongo",
            "--mongodb-collection",
            "produce",
            "--base-path",
            "/v2",
        ])
        .unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.backend_kind(), BackendKind::MongoDB);
        assert_eq!(config.connection_params().mongodb.collection, "produce");
        assert_eq!(config.base_path, "/v2");
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig {
            port: 3000,
            host: "127.0.0.1".to_string(),
            ..Default::default()
        };
        assert_eq!(config.socket_addr(), "127.0.0.1:3000");
    }

    #[test]
    fn test_unknown_backend_falls_back() {
        let config = ServerConfig {
            db_type: "cassandra".to_string(),
            ..Default::default()
        };
        assert_eq!(config.backend_kind(), BackendKind::Sqlite);
    }

    #[test]
    fn test_connection_params() {
        let config = ServerConfig {
            postgres_host: "pg".to_string(),
            mysql_password: "secret".to_string(),
            db_max_connections: 3,
            db_timeout: 2,
            ..Default::default()
        };
        let params = config.connection_params();
        assert_eq!(params.postgres.host, "pg");
        assert_eq!(params.mysql.password, "secret");
        assert_eq!(params.pool.max_connections, 3);
        assert_eq!(params.pool.connect_timeout_secs, 2);
        assert_eq!(params.sqlite_path, PathBuf::from("fruits.db"));
    }

    #[test]
    fn test_validate_valid() {
        assert!(ServerConfig::default().validate().is_ok());
        let root = ServerConfig {
            base_path: String::new(),
            ..Default::default()
        };
        assert!(root.validate().is_ok());
    }

    #[test]
    fn test_validate_collects_every_problem() {
        let config = ServerConfig {
            port: 0,
            request_timeout: 0,
            db_max_connections: 0,
            base_path: "api".to_string(),
            ..Default::default()
        };
        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.iter().any(|e| e.contains("Port")));
        assert!(errors.iter().any(|e| e.contains("Base path")));
    }

    #[test]
    fn test_normalized_base_path() {
        let config = ServerConfig {
            base_path: "/api/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.normalized_base_path(), "/api");

        let root = ServerConfig {
            base_path: "/".to_string(),
            ..Default::default()
        };
        assert_eq!(root.normalized_base_path(), "");
    }

    #[test]
    fn test_for_testing() {
        let config = ServerConfig::for_testing();
        assert_eq!(config.port, 0);
        assert!(!config.enable_cors);
        assert_eq!(config.db_file, PathBuf::from(":memory:"));
    }
}
