//! FruitRepository implementation for the relational backends.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::any::AnyRow;
use sqlx::{Any, Row, Transaction};
use tracing::{debug, warn};

use super::backend::SqlBackend;
use super::dialect::{InsertIdStrategy, SqlDialect, contains_pattern};
use crate::core::FruitRepository;
use crate::error::{BackendError, ResourceError, StorageResult};
use crate::types::{Fruit, FruitId, NewFruit, parse_timestamp};

const SELECT_COLUMNS: &str = "SELECT id, name, season, emoji, created_at, modified_at FROM fruits";

const ORDER_BY_NAME: &str = "ORDER BY name ASC, id ASC";

/// Statement texts rendered once for a dialect.
#[derive(Debug, Clone)]
pub struct FruitStatements {
    pub insert: String,
    pub list_all: String,
    pub find_by_name: String,
    pub find_by_season: String,
    pub delete_by_id: String,
    pub delete_all: String,
    pub count_by_id: String,
}

impl FruitStatements {
    pub fn for_dialect(dialect: SqlDialect) -> Self {
        let p = |i| dialect.placeholder(i);

        let mut insert = format!(
            "INSERT INTO fruits (name, season, emoji, created_at) VALUES ({}, {}, {}, {})",
            p(1),
            p(2),
            p(3),
            p(4)
        );
        if dialect.insert_id_strategy() == InsertIdStrategy::Returning {
            insert.push_str(" RETURNING id");
        }

        Self {
            insert,
            list_all: format!("{} {}", SELECT_COLUMNS, ORDER_BY_NAME),
            find_by_name: format!(
                "{} WHERE LOWER(name) LIKE LOWER({}) ESCAPE '!' {}",
                SELECT_COLUMNS,
                p(1),
                ORDER_BY_NAME
            ),
            find_by_season: format!(
                "{} WHERE LOWER(season) = LOWER({}) {}",
                SELECT_COLUMNS,
                p(1),
                ORDER_BY_NAME
            ),
            delete_by_id: format!("DELETE FROM fruits WHERE id = {}", p(1)),
            delete_all: "DELETE FROM fruits".to_string(),
            count_by_id: format!("SELECT COUNT(*) FROM fruits WHERE id = {}", p(1)),
        }
    }
}

fn fruit_from_row(row: &AnyRow) -> Result<Fruit, sqlx::Error> {
    let created_at: Option<String> = row.try_get("created_at")?;
    let modified_at: Option<String> = row.try_get("modified_at")?;

    Ok(Fruit {
        id: FruitId::Numeric(row.try_get::<i64, _>("id")?),
        name: row.try_get("name")?,
        season: row.try_get("season")?,
        emoji: row.try_get("emoji")?,
        created_at: created_at.as_deref().and_then(parse_timestamp),
        modified_at: modified_at.as_deref().and_then(parse_timestamp),
    })
}

impl SqlBackend {
    async fn fetch_fruits(&self, sql: &str, arg: Option<String>) -> StorageResult<Vec<Fruit>> {
        let mut query = sqlx::query(sql);
        if let Some(arg) = arg {
            query = query.bind(arg);
        }

        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BackendError::query(self.dialect, e))?;

        rows.iter()
            .map(fruit_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| BackendError::query(self.dialect, e).into())
    }

    async fn insert_row(
        &self,
        tx: &mut Transaction<'static, Any>,
        fruit: &NewFruit,
        created_at: &str,
    ) -> Result<i64, sqlx::Error> {
        let query = sqlx::query(&self.statements.insert)
            .bind(fruit.name.as_str())
            .bind(fruit.season.as_str())
            .bind(fruit.emoji_or_default())
            .bind(created_at);

        match self.dialect.insert_id_strategy() {
            InsertIdStrategy::Returning => {
                let row = query.fetch_one(&mut **tx).await?;
                row.try_get::<i64, _>(0)
            }
            InsertIdStrategy::LastInsertId => {
                let result = query.execute(&mut **tx).await?;
                result.last_insert_id().ok_or_else(|| {
                    sqlx::Error::Protocol("driver did not report the inserted id".to_string())
                })
            }
        }
    }

    async fn rollback(&self, tx: Transaction<'static, Any>) {
        if let Err(e) = tx.rollback().await {
            warn!(dialect = %self.dialect, error = %e, "Rollback failed");
        }
    }
}

#[async_trait]
impl FruitRepository for SqlBackend {
    fn backend_name(&self) -> &'static str {
        self.dialect.name()
    }

    async fn insert(&self, fruit: NewFruit) -> StorageResult<Fruit> {
        fruit.validate()?;
        if fruit.id.is_some() {
            debug!(dialect = %self.dialect, "Ignoring client-supplied id on relational insert");
        }

        let created_at = Utc::now();
        let created_text = created_at.to_rfc3339();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BackendError::write(self.dialect, e))?;

        let id = match self.insert_row(&mut tx, &fruit, &created_text).await {
            Ok(id) => id,
            Err(e) => {
                self.rollback(tx).await;
                return Err(BackendError::write(self.dialect, e).into());
            }
        };

        tx.commit()
            .await
            .map_err(|e| BackendError::write(self.dialect, e))?;

        debug!(dialect = %self.dialect, id, name = %fruit.name, "Inserted fruit");
        Ok(fruit.into_fruit(FruitId::Numeric(id), created_at))
    }

    async fn list_all(&self) -> StorageResult<Vec<Fruit>> {
        self.fetch_fruits(&self.statements.list_all, None).await
    }

    async fn find_by_name(&self, name: &str) -> StorageResult<Vec<Fruit>> {
        debug!(dialect = %self.dialect, name, "Finding fruits by name");
        self.fetch_fruits(&self.statements.find_by_name, Some(contains_pattern(name)))
            .await
    }

    async fn find_by_season(&self, season: &str) -> StorageResult<Vec<Fruit>> {
        debug!(dialect = %self.dialect, season, "Finding fruits by season");
        self.fetch_fruits(&self.statements.find_by_season, Some(season.to_string()))
            .await
    }

    async fn delete_by_id(&self, id: &FruitId) -> StorageResult<()> {
        let not_found = || ResourceError::NotFound { id: id.to_string() };

        // Relational ids are always integers.
        let Some(numeric) = id.as_i64() else {
            return Err(not_found().into());
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| BackendError::write(self.dialect, e))?;

        let result = sqlx::query(&self.statements.delete_by_id)
            .bind(numeric)
            .execute(&mut *tx)
            .await;

        match result {
            Ok(done) if done.rows_affected() == 0 => {
                self.rollback(tx).await;
                Err(not_found().into())
            }
            Ok(_) => {
                tx.commit()
                    .await
                    .map_err(|e| BackendError::write(self.dialect, e))?;
                debug!(dialect = %self.dialect, id = numeric, "Deleted fruit");
                Ok(())
            }
            Err(e) => {
                self.rollback(tx).await;
                Err(BackendError::write(self.dialect, e).into())
            }
        }
    }

    async fn delete_all(&self) -> StorageResult<u64> {
        let result = sqlx::query(&self.statements.delete_all)
            .execute(&self.pool)
            .await
            .map_err(|e| BackendError::write(self.dialect, e))?;
        Ok(result.rows_affected())
    }

    async fn exists(&self, id: &FruitId) -> StorageResult<bool> {
        let Some(numeric) = id.as_i64() else {
            return Ok(false);
        };

        let count: i64 = sqlx::query_scalar(&self.statements.count_by_id)
            .bind(numeric)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| BackendError::query(self.dialect, e))?;
        Ok(count > 0)
    }
}
