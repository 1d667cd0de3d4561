//! Database backend implementations.
//!
//! Each backend family is gated behind feature flags.
//!
//! # Available Backends
//!
//! | Backend | Feature | Module |
//! |---------|---------|--------|
//! | SQLite | `sqlite` | [`sql`] |
//! | PostgreSQL | `postgres` | [`sql`] |
//! | MySQL | `mysql` | [`sql`] |
//! | MongoDB | `mongodb` | `mongodb` |

#[cfg(feature = "sql")]
pub mod sql;

#[cfg(feature = "mongodb")]
pub mod mongodb;
