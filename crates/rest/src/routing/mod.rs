//! Route configuration for the Fruits API.

pub mod fruit_routes;

pub use fruit_routes::create_routes;
