//! Table definitions for the relational backends.
//!
//! Every DDL statement is guarded with `IF NOT EXISTS` so schema setup can
//! run on every start.

use sqlx::AnyPool;
use tracing::debug;

use super::dialect::SqlDialect;
use crate::error::BackendError;

/// Name of the single table.
pub const TABLE_NAME: &str = "fruits";

const SQLITE_SCHEMA: &[&str] = &[
    // Readers do not block the single writer.
    "PRAGMA journal_mode = WAL",
    "CREATE TABLE IF NOT EXISTS fruits (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        season TEXT NOT NULL,
        emoji TEXT,
        created_at TEXT NOT NULL,
        modified_at TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_fruits_name ON fruits(name)",
];

const POSTGRES_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS fruits (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL,
        season TEXT NOT NULL,
        emoji TEXT,
        created_at TEXT NOT NULL,
        modified_at TEXT
    )",
    "CREATE INDEX IF NOT EXISTS idx_fruits_name ON fruits(name)",
];

// MySQL has no CREATE INDEX IF NOT EXISTS, so the index is declared inline.
const MYSQL_SCHEMA: &[&str] = &["CREATE TABLE IF NOT EXISTS fruits (
        id BIGINT NOT NULL AUTO_INCREMENT PRIMARY KEY,
        name VARCHAR(255) NOT NULL,
        season VARCHAR(255) NOT NULL,
        emoji VARCHAR(64),
        created_at VARCHAR(64) NOT NULL,
        modified_at VARCHAR(64),
        INDEX idx_fruits_name (name)
    )"];

/// Returns the DDL statements for a dialect, in execution order.
pub fn schema_statements(dialect: SqlDialect) -> &'static [&'static str] {
    match dialect {
        SqlDialect::Sqlite => SQLITE_SCHEMA,
        SqlDialect::Postgres => POSTGRES_SCHEMA,
        SqlDialect::MySql => MYSQL_SCHEMA,
    }
}

/// Creates the `fruits` table and its index if they are missing.
pub async fn initialize_schema(pool: &AnyPool, dialect: SqlDialect) -> Result<(), BackendError> {
    for statement in schema_statements(dialect) {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| BackendError::schema(dialect, e))?;
    }
    debug!(dialect = %dialect, table = TABLE_NAME, "Schema ready");
    Ok(())
}
