//! Relational backends (SQLite, PostgreSQL, MySQL).
//!
//! All three share [`SqlBackend`], which runs over the sqlx `Any` driver and
//! renders its statements for a [`SqlDialect`].
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use fruits_persistence::backends::sql::{SqlBackend, SqlConfig};
//! use fruits_persistence::connector::PoolSettings;
//! use fruits_persistence::core::{Backend, FruitRepository};
//! use fruits_persistence::types::NewFruit;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SqlConfig::sqlite(Path::new("./fruits.db"), &PoolSettings::default());
//! let backend = SqlBackend::connect(config).await?;
//! backend.initialize().await?;
//!
//! let mango = backend.insert(NewFruit::new("Mango", "Spring")).await?;
//! # Ok(())
//! # }
//! ```

mod backend;
mod dialect;
mod schema;
mod storage;

pub use backend::{SqlBackend, SqlConfig};
pub use dialect::{InsertIdStrategy, SqlDialect, contains_pattern, escape_like};
pub use schema::{TABLE_NAME, initialize_schema, schema_statements};
pub use storage::FruitStatements;
