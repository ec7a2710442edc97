use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error codes for structured error bodies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed or invalid request input
    BadRequest,

    /// Missing or invalid credentials
    Unauthorized,

    /// Authenticated but not allowed
    Forbidden,

    /// Resource does not exist
    NotFound,

    /// Request conflicts with current state
    Conflict,

    /// Semantically invalid input
    ValidationError,

    /// Too many requests / rate limit exceeded
    RateLimitExceeded,

    /// Any other 4xx
    ClientError,

    /// Upstream dependency failed (502, 503, 504)
    UpstreamError,

    /// Internal server error
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Unauthorized => write!(f, "UNAUTHORIZED"),
            Self::Forbidden => write!(f, "FORBIDDEN"),
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conflict => write!(f, "CONFLICT"),
            Self::ValidationError => write!(f, "VALIDATION_ERROR"),
            Self::RateLimitExceeded => write!(f, "RATE_LIMIT_EXCEEDED"),
            Self::ClientError => write!(f, "CLIENT_ERROR"),
            Self::UpstreamError => write!(f, "UPSTREAM_ERROR"),
            Self::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

impl ErrorCode {
    /// Pick the code that describes an HTTP status
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest,
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            409 => Self::Conflict,
            422 => Self::ValidationError,
            429 => Self::RateLimitExceeded,
            502..=504 => Self::UpstreamError,
            400..=499 => Self::ClientError,
            _ => Self::InternalError,
        }
    }
}
