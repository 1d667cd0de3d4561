//! Error types for the Fruits REST API.
//!
//! Every error is rendered as the JSON envelope
//! `{"code": <http status>, "message": "<text>"}`.
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status |
//! |--------------|-------------|
//! | Validation | 400 |
//! | NotFound | 404 |
//! | Unavailable | 503 |
//! | Connection, Schema, Write, Query, Internal | 500 |

use std::fmt;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use fruits_persistence::error::{BackendError, ResourceError, StorageError};
use serde::Serialize;
use tracing::{error, warn};

/// The primary error type for REST API operations.
#[derive(Debug)]
pub enum RestError {
    /// Malformed body or invalid field (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Fruit not found (HTTP 404).
    NotFound {
        /// The requested id.
        id: String,
    },

    /// Storage is not reachable (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },
}

/// The JSON body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// The HTTP status code.
    pub code: u16,
    /// Human-readable description.
    pub message: String,
}

impl RestError {
    /// The HTTP status this error is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::NotFound { .. } => StatusCode::NOT_FOUND,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::BadRequest { message } => write!(f, "Bad request: {}", message),
            RestError::NotFound { id } => write!(f, "Fruit with id {} not found", id),
            RestError::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
            RestError::InternalError { message } => write!(f, "Internal error: {}", message),
        }
    }
}

impl std::error::Error for RestError {}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        }

        let body = ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

// Implement conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(ResourceError::NotFound { id }) => RestError::NotFound { id },
            StorageError::Validation(e) => RestError::BadRequest {
                message: e.to_string(),
            },
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable { .. } => {
                warn!(error = %err, "Storage unavailable");
                RestError::ServiceUnavailable {
                    message: err.to_string(),
                }
            }
            _ => RestError::InternalError {
                message: err.to_string(),
            },
        }
    }
}

/// Result type for REST API operations.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use fruits_persistence::error::ValidationError;

    fn backend(name: &str, message: &str) -> (String, String) {
        (name.to_string(), message.to_string())
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let err: RestError = StorageError::Resource(ResourceError::NotFound {
            id: "5".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Fruit with id 5 not found");
    }

    #[test]
    fn test_validation_maps_to_400() {
        let err: RestError = StorageError::Validation(ValidationError::MissingRequiredField {
            field: "name".to_string(),
        })
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("name"));
    }

    #[test]
    fn test_backend_errors_map_by_kind() {
        let (backend_name, message) = backend("sqlite", "ping failed");
        let err: RestError = StorageError::Backend(BackendError::Unavailable {
            backend_name,
            message,
        })
        .into();
        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);

        let (backend_name, message) = backend("postgres", "rolled back");
        let err: RestError = StorageError::Backend(BackendError::WriteFailed {
            backend_name,
            message,
        })
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let (backend_name, message) = backend("mongodb", "cursor died");
        let err: RestError = StorageError::Backend(BackendError::QueryFailed {
            backend_name,
            message,
        })
        .into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_error_body_shape() {
        let body = ErrorBody {
            code: 404,
            message: "Fruit with id 7 not found".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"code": 404, "message": "Fruit with id 7 not found"})
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = RestError::BadRequest {
            message: "missing field `name`".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
