//! Core storage traits and abstractions.
//!
//! - [`Backend`] - Schema setup and health probing
//! - [`FruitRepository`] - CRUD and search over fruits
//! - [`FruitStore`] - Both of the above, as held by the HTTP layer
//!
//! ```text
//! Backend ──┐
//!           ├── FruitStore
//! FruitRepository ──┘
//! ```

mod backend;
mod storage;

pub use backend::{Backend, BackendKind};
pub use storage::{FruitRepository, FruitStore};
