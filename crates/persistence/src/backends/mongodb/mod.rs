//! MongoDB document store backend.
//!
//! Fruits are stored as plain documents in one collection. Ids are whatever
//! the server assigns (an ObjectId) unless the client supplies one.

mod backend;
mod storage;

pub use backend::MongoBackend;
