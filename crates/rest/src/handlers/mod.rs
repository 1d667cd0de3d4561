//! HTTP request handlers.
//!
//! - [`fruits`] - Fruit create, list, search and delete
//! - [`health`] - Liveness and readiness probes

pub mod fruits;
pub mod health;

pub use fruits::{
    add_fruit_handler, delete_all_handler, delete_fruit_handler, find_by_name_handler,
    find_by_season_handler, list_fruits_handler,
};
pub use health::{liveness_handler, readiness_handler};
