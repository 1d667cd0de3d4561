//! Fruits API persistence layer
//!
//! This crate stores fruits in one of several interchangeable backends and
//! gives every backend the same query semantics: name search is a
//! case-insensitive substring match, season search is a case-insensitive
//! exact match, listings are ordered by name, and writes are all-or-nothing.
//!
//! # Backend Features
//!
//! Enable backends with feature flags in `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! fruits-persistence = { version = "0.1", features = ["postgres", "mongodb"] }
//! ```
//!
//! Available backend features:
//! - `sqlite` (default) - SQLite, file-based or in-memory
//! - `postgres` - PostgreSQL
//! - `mysql` - MySQL / MariaDB
//! - `mongodb` - MongoDB document storage
//!
//! # Architecture
//!
//! - [`types`] - The fruit entity and its identifier
//! - [`error`] - Error types for all operations
//! - [`core`] - The [`Backend`](core::Backend) and [`FruitRepository`](core::FruitRepository) traits
//! - [`backends`] - Backend implementations (one SQL family, one document store)
//! - [`connector`] - Configuration and exactly-once initialization
//! - [`fixtures`] - YAML seed data
//!
//! # Quick Start
//!
//! ```no_run
//! use fruits_persistence::connector::{ConnectionParams, Connector};
//! use fruits_persistence::core::BackendKind;
//! use fruits_persistence::types::NewFruit;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let connector = Connector::configure(BackendKind::Sqlite, &ConnectionParams::sqlite("fruits.db"));
//! let store = connector.initialize().await?;
//!
//! store.insert(NewFruit::new("Apple", "Fall")).await?;
//! let apples = store.find_by_name("APPLE").await?;
//! assert_eq!(apples.len(), 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_debug_implementations)]

pub mod backends;
pub mod connector;
pub mod core;
pub mod error;
pub mod fixtures;
pub mod types;

pub use connector::{ConnectionParams, Connector};
pub use error::{StorageError, StorageResult};
