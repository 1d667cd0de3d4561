//! Core fruit storage trait.
//!
//! This module defines the [`FruitRepository`] trait, the uniform data-access
//! contract every backend family implements, and [`FruitStore`], the combined
//! lifecycle-plus-data trait that handlers depend on.

use async_trait::async_trait;

use crate::core::Backend;
use crate::error::StorageResult;
use crate::types::{Fruit, FruitId, NewFruit};

/// Data-access contract over the fruit entity.
///
/// Every backend returns identical results for identical inputs:
///
/// - Listings are ordered by name ascending (backend default collation).
/// - Name search is a case-insensitive substring match.
/// - Season search is a case-insensitive exact match.
/// - Writes are all-or-nothing.
///
/// Errors are always returned to the caller. Implementations never log and
/// continue.
///
/// # Example
///
/// ```ignore
/// use fruits_persistence::core::FruitRepository;
/// use fruits_persistence::types::NewFruit;
///
/// async fn example<R: FruitRepository>(repo: &R) -> StorageResult<()> {
///     let apple = repo.insert(NewFruit::new("Apple", "Fall")).await?;
///     let found = repo.find_by_name("APP").await?;
///     assert_eq!(found[0].id, apple.id);
///
///     repo.delete_by_id(&apple.id).await?;
///     assert!(!repo.exists(&apple.id).await?);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait FruitRepository: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Stores a new fruit and returns it with its assigned id.
    ///
    /// An empty emoji is replaced with [`DEFAULT_EMOJI`](crate::types::DEFAULT_EMOJI).
    ///
    /// # Errors
    ///
    /// * `StorageError::Validation` - If name or season is blank
    /// * `StorageError::Backend(WriteFailed)` - If the write was rolled back
    async fn insert(&self, fruit: NewFruit) -> StorageResult<Fruit>;

    /// Returns every stored fruit ordered by name. An empty store yields an
    /// empty vector.
    async fn list_all(&self) -> StorageResult<Vec<Fruit>>;

    /// Returns fruits whose name contains `name`, ignoring case.
    async fn find_by_name(&self, name: &str) -> StorageResult<Vec<Fruit>>;

    /// Returns fruits whose season equals `season`, ignoring case.
    async fn find_by_season(&self, season: &str) -> StorageResult<Vec<Fruit>>;

    /// Permanently removes the fruit with the given id.
    ///
    /// # Errors
    ///
    /// * `StorageError::Resource(NotFound)` - If no fruit has this id
    /// * `StorageError::Backend(WriteFailed)` - If the delete was rolled back
    async fn delete_by_id(&self, id: &FruitId) -> StorageResult<()>;

    /// Removes every fruit and returns how many were deleted.
    async fn delete_all(&self) -> StorageResult<u64>;

    /// Returns true if a fruit with the given id is stored.
    async fn exists(&self, id: &FruitId) -> StorageResult<bool>;
}

/// A fully usable backend: lifecycle plus data access.
pub trait FruitStore: Backend + FruitRepository {}

impl<T: Backend + FruitRepository + ?Sized> FruitStore for T {}
