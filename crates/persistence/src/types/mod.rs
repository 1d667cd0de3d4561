//! Core types for the persistence layer.
//!
//! - [`Fruit`] - A stored fruit with its storage-assigned id
//! - [`NewFruit`] - The insert payload
//! - [`FruitId`] - Numeric (relational) or opaque (document store) identifier
//!
//! # Examples
//!
//! ```
//! use fruits_persistence::types::{FruitId, NewFruit, DEFAULT_EMOJI};
//!
//! let fruit = NewFruit::new("Mango", "Spring");
//! assert!(fruit.validate().is_ok());
//! assert_eq!(fruit.emoji_or_default(), DEFAULT_EMOJI);
//!
//! assert_eq!(FruitId::parse("7"), FruitId::Numeric(7));
//! ```

mod fruit;

pub use fruit::{DEFAULT_EMOJI, Fruit, FruitId, NewFruit};

pub(crate) use fruit::parse_timestamp;
