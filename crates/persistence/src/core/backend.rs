//! Backend abstraction for database drivers.
//!
//! This module defines the [`Backend`] trait, the lifecycle half of a storage
//! backend: schema setup and health probing. The data-access half lives in
//! [`FruitRepository`](super::FruitRepository).

use std::fmt::Debug;
use std::str::FromStr;

use async_trait::async_trait;
use tracing::warn;

use crate::error::BackendError;

/// Identifies the type of database backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    /// SQLite database (file-based or in-memory).
    #[default]
    Sqlite,
    /// PostgreSQL database.
    Postgres,
    /// MySQL or MariaDB database.
    MySql,
    /// MongoDB (document store).
    MongoDB,
}

impl BackendKind {
    /// Returns true for the relational backends.
    pub fn is_sql(&self) -> bool {
        !matches!(self, BackendKind::MongoDB)
    }

    /// Parses a backend selector, falling back to SQLite for unknown values.
    pub fn parse_lenient(value: &str) -> Self {
        value.parse().unwrap_or_else(|_| {
            warn!(
                db_type = %value,
                "Unknown database type, falling back to sqlite"
            );
            BackendKind::Sqlite
        })
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Sqlite => write!(f, "sqlite"),
            BackendKind::Postgres => write!(f, "postgres"),
            BackendKind::MySql => write!(f, "mysql"),
            BackendKind::MongoDB => write!(f, "mongodb"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "sqlite3" => Ok(BackendKind::Sqlite),
            "pg" | "pgsql" | "postgres" | "postgresql" => Ok(BackendKind::Postgres),
            "mysql" | "mariadb" => Ok(BackendKind::MySql),
            "mongo" | "mongodb" => Ok(BackendKind::MongoDB),
            other => Err(format!("unknown database type: {}", other)),
        }
    }
}

/// A database backend with a schema to prepare and a connection to probe.
///
/// The trait is object-safe so the server can hold the selected backend as a
/// trait object.
#[async_trait]
pub trait Backend: Send + Sync + Debug {
    /// Returns the kind of backend.
    fn kind(&self) -> BackendKind;

    /// Returns a human-readable name for this backend.
    fn name(&self) -> &'static str;

    /// Checks that the backend answers a lightweight round-trip.
    ///
    /// Must not mutate any state.
    async fn health_check(&self) -> Result<(), BackendError>;

    /// Creates the `fruits` table or collection if it does not exist.
    ///
    /// Safe to call repeatedly.
    async fn initialize(&self) -> Result<(), BackendError>;
}
