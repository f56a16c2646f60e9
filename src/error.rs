//! Error type for endpoint handlers and the router.

use std::error::Error;
use std::fmt;

use http::StatusCode;
use serde_json::{json, Value};

use crate::store::{DecodeError, StoreError};

/// Error type for endpoint handler operations.
///
/// Handlers classify failures into one of these and hand them back to the
/// router, which is the only place they become HTTP statuses.
#[derive(Debug)]
pub enum ApiError {
    /// Requested resource is absent (or a write precondition failed).
    NotFound(String),
    /// Request body or parameters are malformed.
    InvalidInput(String),
    /// No endpoint matched the request.
    NoRoute { method: String, path: String },
    /// A stored record could not be converted into an entity.
    Decode(DecodeError),
    /// Store failure not classified above.
    Store(StoreError),
    /// Other error.
    Internal(Box<dyn Error + Send + Sync>),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(what) => write!(f, "not found: {}", what),
            ApiError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            ApiError::NoRoute { method, path } => write!(f, "no route for {} {}", method, path),
            ApiError::Decode(e) => write!(f, "decode error: {}", e),
            ApiError::Store(e) => write!(f, "store error: {}", e),
            ApiError::Internal(e) => write!(f, "internal error: {}", e),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Decode(e) => Some(e),
            ApiError::Store(e) => Some(e),
            ApiError::Internal(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) | StoreError::PreconditionFailed(id) => {
                ApiError::NotFound(id.to_string())
            }
            other => ApiError::Store(other),
        }
    }
}

impl From<DecodeError> for ApiError {
    fn from(err: DecodeError) -> Self {
        ApiError::Decode(err)
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::InvalidInput(err.to_string())
    }
}

impl ApiError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::NoRoute { .. } => StatusCode::NOT_FOUND,
            ApiError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures that are the server's fault.
    pub fn is_internal(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// The `{"error": ...}` body sent to the client.
    ///
    /// Client errors echo their message; server errors only ever say
    /// "internal server error". Details of those belong in the logs.
    pub fn to_body(&self) -> Value {
        if self.is_internal() {
            json!({ "error": "internal server error" })
        } else {
            json!({ "error": self.to_string() })
        }
    }
}
