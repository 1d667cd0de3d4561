//! Liveness and readiness probes.

use axum::{Json, extract::State};
use fruits_persistence::core::FruitStore;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::state::AppState;

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET [base]/health/live`
pub async fn liveness_handler() -> Json<&'static str> {
    Json("live")
}

/// Handler for the readiness probe. Pings the storage backend without
/// touching any data.
///
/// # HTTP Request
///
/// `GET [base]/health/ready`
///
/// # Response
///
/// - `200 OK` - `"READY"`
/// - `503 Service Unavailable` - The backend did not answer
pub async fn readiness_handler<S>(
    State(state): State<AppState<S>>,
) -> RestResult<Json<&'static str>>
where
    S: FruitStore + ?Sized,
{
    debug!(backend = state.storage().name(), "Processing readiness check");

    state
        .storage()
        .health_check()
        .await
        .map_err(|e| RestError::ServiceUnavailable {
            message: e.to_string(),
        })?;

    Ok(Json("READY"))
}
