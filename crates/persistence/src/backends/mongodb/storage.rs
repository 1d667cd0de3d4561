//! FruitRepository implementation for MongoDB.

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use tracing::debug;

use super::backend::MongoBackend;
use crate::core::FruitRepository;
use crate::error::{BackendError, ResourceError, StorageResult};
use crate::types::{Fruit, FruitId, NewFruit, parse_timestamp};

const BACKEND_NAME: &str = "mongodb";

/// Converts a stored `_id` into a [`FruitId`].
pub(crate) fn id_from_bson(value: &Bson) -> Option<FruitId> {
    match value {
        Bson::ObjectId(oid) => Some(FruitId::Opaque(oid.to_hex())),
        Bson::String(s) => Some(FruitId::Opaque(s.clone())),
        Bson::Int32(n) => Some(FruitId::Numeric(i64::from(*n))),
        Bson::Int64(n) => Some(FruitId::Numeric(*n)),
        _ => None,
    }
}

/// The `_id` value to store for a client-supplied id.
pub(crate) fn id_to_bson(id: &FruitId) -> Bson {
    match id {
        FruitId::Numeric(n) => Bson::Int64(*n),
        FruitId::Opaque(s) => match ObjectId::parse_str(s) {
            Ok(oid) => Bson::ObjectId(oid),
            Err(_) => Bson::String(s.clone()),
        },
    }
}

/// Matches a document by id. Hex strings match both an ObjectId and a plain
/// string `_id`; integers match both an integer and a digit-string `_id`.
pub(crate) fn id_filter(id: &FruitId) -> Document {
    match id {
        FruitId::Numeric(n) => doc! { "_id": { "$in": [*n, n.to_string()] } },
        FruitId::Opaque(s) => match ObjectId::parse_str(s) {
            Ok(oid) => doc! { "_id": { "$in": [oid, s.as_str()] } },
            Err(_) => doc! { "_id": s.as_str() },
        },
    }
}

pub(crate) fn name_filter(name: &str) -> Document {
    doc! { "name": { "$regex": regex::escape(name), "$options": "i" } }
}

pub(crate) fn season_filter(season: &str) -> Document {
    doc! { "season": { "$regex": format!("^{}$", regex::escape(season)), "$options": "i" } }
}

fn fruit_from_document(document: &Document) -> Result<Fruit, BackendError> {
    let id = document
        .get("_id")
        .and_then(id_from_bson)
        .ok_or_else(|| BackendError::query(BACKEND_NAME, "document has no usable _id"))?;
    let name = document
        .get_str("name")
        .map_err(|e| BackendError::query(BACKEND_NAME, e))?;
    let season = document
        .get_str("season")
        .map_err(|e| BackendError::query(BACKEND_NAME, e))?;

    Ok(Fruit {
        id,
        name: name.to_string(),
        season: season.to_string(),
        emoji: document.get_str("emoji").ok().map(str::to_string),
        created_at: document.get_str("created_at").ok().and_then(parse_timestamp),
        modified_at: document.get_str("modified_at").ok().and_then(parse_timestamp),
    })
}

impl MongoBackend {
    async fn find(&self, filter: Document) -> StorageResult<Vec<Fruit>> {
        let mut cursor = self
            .collection
            .find(filter)
            .sort(doc! { "name": 1 })
            .await
            .map_err(|e| BackendError::query(BACKEND_NAME, e))?;

        let mut fruits = Vec::new();
        while cursor
            .advance()
            .await
            .map_err(|e| BackendError::query(BACKEND_NAME, e))?
        {
            let document = cursor
                .deserialize_current()
                .map_err(|e| BackendError::query(BACKEND_NAME, e))?;
            fruits.push(fruit_from_document(&document)?);
        }
        Ok(fruits)
    }
}

#[async_trait]
impl FruitRepository for MongoBackend {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn insert(&self, fruit: NewFruit) -> StorageResult<Fruit> {
        fruit.validate()?;

        let created_at = Utc::now();
        let mut document = doc! {
            "name": fruit.name.as_str(),
            "season": fruit.season.as_str(),
            "emoji": fruit.emoji_or_default(),
            "created_at": created_at.to_rfc3339(),
        };
        if let Some(id) = &fruit.id {
            document.insert("_id", id_to_bson(id));
        }

        let result = self
            .collection
            .insert_one(document)
            .await
            .map_err(|e| BackendError::write(BACKEND_NAME, e))?;

        let id = id_from_bson(&result.inserted_id).ok_or_else(|| {
            BackendError::write(BACKEND_NAME, "unsupported _id type in acknowledgment")
        })?;

        debug!(id = %id, name = %fruit.name, "Inserted fruit");
        Ok(fruit.into_fruit(id, created_at))
    }

    async fn list_all(&self) -> StorageResult<Vec<Fruit>> {
        self.find(doc! {}).await
    }

    async fn find_by_name(&self, name: &str) -> StorageResult<Vec<Fruit>> {
        debug!(name, "Finding fruits by name");
        self.find(name_filter(name)).await
    }

    async fn find_by_season(&self, season: &str) -> StorageResult<Vec<Fruit>> {
        debug!(season, "Finding fruits by season");
        self.find(season_filter(season)).await
    }

    async fn delete_by_id(&self, id: &FruitId) -> StorageResult<()> {
        let result = self
            .collection
            .delete_one(id_filter(id))
            .await
            .map_err(|e| BackendError::write(BACKEND_NAME, e))?;

        if result.deleted_count == 0 {
            return Err(ResourceError::NotFound { id: id.to_string() }.into());
        }

        debug!(id = %id, "Deleted fruit");
        Ok(())
    }

    async fn delete_all(&self) -> StorageResult<u64> {
        let result = self
            .collection
            .delete_many(doc! {})
            .await
            .map_err(|e| BackendError::write(BACKEND_NAME, e))?;
        Ok(result.deleted_count)
    }

    async fn exists(&self, id: &FruitId) -> StorageResult<bool> {
        let count = self
            .collection
            .count_documents(id_filter(id))
            .await
            .map_err(|e| BackendError::query(BACKEND_NAME, e))?;
        Ok(count > 0)
    }
}
