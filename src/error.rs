//! Error types for the namespaced cache
//!
//! Provides unified error handling using thiserror. Store and codec failures
//! have their own enums because the cache client recovers from them locally;
//! only `CacheError` ever reaches a caller.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Errors surfaced to callers of the cache and the HTTP layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Namespace was empty or otherwise unusable
    #[error("Invalid namespace: {0}")]
    InvalidNamespace(String),

    /// Construction parameters cannot produce valid composite keys
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Key not present for the namespace's current generation
    #[error("Key not found: {0}")]
    NotFound(String),
}

// == Store Error Enum ==
/// Failures reported by a remote store implementation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Store did not answer in time
    #[error("store operation timed out after {0} ms")]
    Timeout(u64),

    /// Store refused the operation (e.g. value too large)
    #[error("store rejected operation: {0}")]
    Rejected(String),
}

// == Codec Error Enum ==
/// Failures decoding a stored payload.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("payload is missing its format tag")]
    MissingTag,

    #[error("unknown payload format tag {0:#04x}")]
    UnknownTag(u8),

    #[error("declared payload size exceeds safety limit")]
    DecompressionBomb,

    #[error("decompression failed: {0}")]
    DecompressionFailed(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidNamespace(_) | CacheError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            CacheError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
