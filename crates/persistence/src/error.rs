//! Error types for the persistence layer.
//!
//! Storage failures are grouped by category: resource state (not found),
//! request validation, and backend failures (connection, schema, writes,
//! reads, health).

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Resource state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

impl StorageError {
    /// Returns true if this error means the requested fruit does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Resource(ResourceError::NotFound { .. }))
    }
}

/// Errors related to resource state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// No fruit with the given id exists.
    #[error("fruit not found: {id}")]
    NotFound { id: String },
}

/// Errors related to the shape of client-supplied data.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// A required field was missing or blank.
    #[error("missing required field: {field}")]
    MissingRequiredField { field: String },

    /// The id could not be interpreted by the backend.
    #[error("invalid fruit id: {value}")]
    InvalidId { value: String },

    /// A fixture file could not be parsed.
    #[error("invalid fixture data: {message}")]
    InvalidFixture { message: String },
}

/// Backend-specific errors.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend did not answer a health probe, or is not initialized.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Table or collection setup failed.
    #[error("schema setup failed for {backend_name}: {message}")]
    SchemaFailed {
        backend_name: String,
        message: String,
    },

    /// An insert or delete failed and was rolled back.
    #[error("write failed on {backend_name}: {message}")]
    WriteFailed {
        backend_name: String,
        message: String,
    },

    /// A read query failed.
    #[error("query execution failed on {backend_name}: {message}")]
    QueryFailed {
        backend_name: String,
        message: String,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl BackendError {
    pub(crate) fn connection(backend: impl ToString, err: impl ToString) -> Self {
        BackendError::ConnectionFailed {
            backend_name: backend.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn schema(backend: impl ToString, err: impl ToString) -> Self {
        BackendError::SchemaFailed {
            backend_name: backend.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(backend: impl ToString, err: impl ToString) -> Self {
        BackendError::WriteFailed {
            backend_name: backend.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn query(backend: impl ToString, err: impl ToString) -> Self {
        BackendError::QueryFailed {
            backend_name: backend.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn unavailable(backend: impl ToString, err: impl ToString) -> Self {
        BackendError::Unavailable {
            backend_name: backend.to_string(),
            message: err.to_string(),
        }
    }
}

/// Result type alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Internal {
            backend_name: "filesystem".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Backend(err.into())
    }
}

impl From<serde_yaml::Error> for StorageError {
    fn from(err: serde_yaml::Error) -> Self {
        StorageError::Validation(ValidationError::InvalidFixture {
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_error_display() {
        let err = StorageError::Resource(ResourceError::NotFound {
            id: "42".to_string(),
        });
        assert_eq!(err.to_string(), "fruit not found: 42");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::MissingRequiredField {
            field: "season".to_string(),
        };
        assert_eq!(err.to_string(), "missing required field: season");
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::write("sqlite", "disk I/O error");
        assert_eq!(err.to_string(), "write failed on sqlite: disk I/O error");

        let err = BackendError::connection("postgres", "refused");
        assert!(err.to_string().starts_with("connection failed to postgres"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: StorageError = io.into();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::Internal { .. })
        ));
        assert!(!err.is_not_found());
    }
}
