//! Fruit API route configuration.

use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use fruits_persistence::core::FruitStore;

use crate::handlers;
use crate::state::AppState;

const ADD_SEGMENT: &str = "add";

/// Creates all Fruits API routes, mounted under the configured base path.
///
/// # Routes
///
/// - `POST /fruits/add` - Create
/// - `GET /fruits` - List
/// - `DELETE /fruits` - Delete all
/// - `GET /fruits/{name}` - Name search
/// - `DELETE /fruits/{id}` - Delete one
/// - `GET /fruits/search/{name}` - Name search
/// - `GET /fruits/season/{season}` - Season search
/// - `GET /health/live` - Liveness
/// - `GET /health/ready` - Readiness
///
/// Both `/fruits` and `/fruits/` are accepted. `GET` and `DELETE` on
/// `/fruits/add` treat `add` as a name or id, like any other segment.
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: FruitStore + ?Sized + 'static,
{
    let base_path = state.config().normalized_base_path().to_string();

    let collection = get(handlers::list_fruits_handler::<S>)
        .delete(handlers::delete_all_handler::<S>);

    let api = Router::new()
        // Health
        .route("/health/live", get(handlers::liveness_handler))
        .route("/health/ready", get(handlers::readiness_handler::<S>))
        // Collection
        .route("/fruits", collection.clone())
        .route("/fruits/", collection)
        .route(
            "/fruits/add",
            post(handlers::add_fruit_handler::<S>)
                .get(|state: State<AppState<S>>| {
                    handlers::find_by_name_handler(state, Path(ADD_SEGMENT.to_string()))
                })
                .delete(|state: State<AppState<S>>| {
                    handlers::delete_fruit_handler(state, Path(ADD_SEGMENT.to_string()))
                }),
        )
        // Search
        .route(
            "/fruits/search/{name}",
            get(handlers::find_by_name_handler::<S>),
        )
        .route(
            "/fruits/season/{season}",
            get(handlers::find_by_season_handler::<S>),
        )
        // Instance
        .route(
            "/fruits/{key}",
            get(handlers::find_by_name_handler::<S>).delete(handlers::delete_fruit_handler::<S>),
        )
        .with_state(state);

    if base_path.is_empty() {
        api
    } else {
        Router::new().nest(&base_path, api)
    }
}
