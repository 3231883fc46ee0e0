//! Error types for the cache daemon
//!
//! `CacheError` is what the engine returns; `RpcError` is what the service
//! layer puts on the wire. Both use thiserror.

use std::fmt;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cache::ContentType;

// == Cache Error Enum ==
/// Recoverable failures of cache operations.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key absent, or its TTL has elapsed
    #[error("cache: key not found: {0}")]
    NotFound(String),

    /// Key live, but stored under a different content type
    #[error("cache: incorrect data type for key {key}: expected {expected}, found {actual}")]
    IncorrectType {
        key: String,
        expected: ContentType,
        actual: ContentType,
    },

    /// Structured encode/decode failure
    #[error("cache: serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Text entry holding bytes that are not UTF-8
    #[error("cache: stored text is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
}

// == Result Type Alias ==
/// Convenience Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

// == RPC Status Codes ==
/// Status codes carried in RPC error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Code {
    InvalidArgument,
    NotFound,
    FailedPrecondition,
    Internal,
    #[serde(other)]
    Unknown,
}

impl Code {
    pub fn as_str(self) -> &'static str {
        match self {
            Code::InvalidArgument => "invalid_argument",
            Code::NotFound => "not_found",
            Code::FailedPrecondition => "failed_precondition",
            Code::Internal => "internal",
            Code::Unknown => "unknown",
        }
    }

    /// HTTP status used when the code is sent over HTTP.
    pub fn http_status(self) -> StatusCode {
        match self {
            Code::InvalidArgument | Code::FailedPrecondition => StatusCode::BAD_REQUEST,
            Code::NotFound => StatusCode::NOT_FOUND,
            Code::Internal | Code::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// == RPC Error ==
/// A failed RPC: status code plus human-readable message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{code}: {message}")]
pub struct RpcError {
    pub code: Code,
    pub message: String,
}

impl RpcError {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }
}

impl From<CacheError> for RpcError {
    fn from(err: CacheError) -> Self {
        let code = match &err {
            CacheError::NotFound(_) => Code::NotFound,
            CacheError::IncorrectType { .. } => Code::FailedPrecondition,
            CacheError::Serialization(_) | CacheError::InvalidUtf8(_) => Code::Internal,
        };
        Self::new(code, err.to_string())
    }
}

impl From<JsonRejection> for RpcError {
    fn from(rejection: JsonRejection) -> Self {
        Self::invalid_argument(rejection.body_text())
    }
}

/// Wire body of an RPC failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: Code,
    pub message: String,
}

// == IntoResponse Implementation ==
impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = self.code.http_status();
        let body = Json(ErrorResponse {
            code: self.code,
            message: self.message,
        });

        (status, body).into_response()
    }
}
