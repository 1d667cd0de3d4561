//! Fruit CRUD handlers.
//!
//! - `POST [base]/fruits/add` - create
//! - `GET [base]/fruits` - list every fruit
//! - `GET [base]/fruits/{name}` and `[base]/fruits/search/{name}` - name search
//! - `GET [base]/fruits/season/{season}` - season search
//! - `DELETE [base]/fruits/{id}` - delete one
//! - `DELETE [base]/fruits` - delete all

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fruits_persistence::core::FruitStore;
use fruits_persistence::types::{Fruit, FruitId, NewFruit};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Body returned by the delete-all route.
#[derive(Debug, Serialize)]
pub struct DeletedCount {
    /// Number of removed fruits.
    pub deleted: u64,
}

/// Handler for creating a fruit.
///
/// Any `id` in the body is ignored; the backend assigns one. A missing or
/// empty emoji is stored as the default code point.
///
/// # Response
///
/// - `201 Created` - The stored fruit, including its id
/// - `400 Bad Request` - Malformed JSON or a blank name/season
/// - `500 Internal Server Error` - The write failed
///
/// # Example
///
/// ```http
/// POST /api/fruits/add HTTP/1.1
/// Content-Type: application/json
///
/// {"name": "Apple", "season": "Fall", "emoji": "U+1F34E"}
/// ```
pub async fn add_fruit_handler<S>(
    State(state): State<AppState<S>>,
    payload: Result<Json<NewFruit>, JsonRejection>,
) -> RestResult<Response>
where
    S: FruitStore + ?Sized,
{
    let Json(fruit) = payload.map_err(|rejection| RestError::BadRequest {
        message: rejection.body_text(),
    })?;

    debug!(name = %fruit.name, season = %fruit.season, "Processing add request");

    let created = state.storage().insert(fruit).await?;

    info!(id = %created.id, name = %created.name, "Fruit created");
    Ok((StatusCode::CREATED, Json(created)).into_response())
}

/// Handler for listing every fruit, ordered by name.
pub async fn list_fruits_handler<S>(
    State(state): State<AppState<S>>,
) -> RestResult<Json<Vec<Fruit>>>
where
    S: FruitStore + ?Sized,
{
    debug!("Processing list request");
    let fruits = state.storage().list_all().await?;
    Ok(Json(fruits))
}

/// Handler for case-insensitive substring search on the name.
pub async fn find_by_name_handler<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
) -> RestResult<Json<Vec<Fruit>>>
where
    S: FruitStore + ?Sized,
{
    debug!(name = %name, "Processing name search");
    let fruits = state.storage().find_by_name(&name).await?;
    Ok(Json(fruits))
}

/// Handler for case-insensitive exact match on the season.
pub async fn find_by_season_handler<S>(
    State(state): State<AppState<S>>,
    Path(season): Path<String>,
) -> RestResult<Json<Vec<Fruit>>>
where
    S: FruitStore + ?Sized,
{
    debug!(season = %season, "Processing season search");
    let fruits = state.storage().find_by_season(&season).await?;
    Ok(Json(fruits))
}

/// Handler for deleting one fruit by id.
///
/// # Response
///
/// - `204 No Content` - Fruit deleted
/// - `404 Not Found` - No fruit has this id
pub async fn delete_fruit_handler<S>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> RestResult<StatusCode>
where
    S: FruitStore + ?Sized,
{
    let id = FruitId::parse(&id);
    debug!(id = %id, "Processing delete request");

    state.storage().delete_by_id(&id).await?;

    info!(id = %id, "Fruit deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Handler for removing every fruit.
pub async fn delete_all_handler<S>(
    State(state): State<AppState<S>>,
) -> RestResult<Json<DeletedCount>>
where
    S: FruitStore + ?Sized,
{
    let deleted = state.storage().delete_all().await?;
    info!(deleted, "All fruits deleted");
    Ok(Json(DeletedCount { deleted }))
}
