use axum::http::StatusCode;
use std::backtrace::BacktraceStatus;
use std::error::Error as StdError;
use std::fmt;

/// A classified, client-facing error carrying the HTTP status it should map to.
///
/// Handlers build one when a failure is expected (bad input, missing
/// credentials, ...). The adapter renders its message with its status instead of
/// hiding it behind a generic 500.
#[derive(Debug)]
pub struct AppError {
    err: anyhow::Error,
    status: StatusCode,
}

/// Rejected integer status code
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid HTTP status code: {0}")]
pub struct StatusCodeError(pub u16);

impl AppError {
    /// Wrap an existing error with the status it should be reported as.
    ///
    /// `StatusCode` admits 100 through 999; anything outside 100..=599 is
    /// stored as 500 Internal Server Error.
    pub fn new(status: StatusCode, err: impl Into<anyhow::Error>) -> Self {
        let status = if (100..=599).contains(&status.as_u16()) {
            status
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        Self {
            err: err.into(),
            status,
        }
    }

    pub fn status(status: StatusCode, message: impl fmt::Display) -> Self {
        Self::new(status, anyhow::Error::msg(message.to_string()))
    }

    pub fn bad_request(message: impl fmt::Display) -> Self {
        Self::status(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl fmt::Display) -> Self {
        Self::status(StatusCode::UNAUTHORIZED, message)
    }

    /// Build from a raw integer status, accepting only 1xx through 5xx
    pub fn from_u16(code: u16, message: impl fmt::Display) -> Result<Self, StatusCodeError> {
        if !(100..=599).contains(&code) {
            return Err(StatusCodeError(code));
        }
        let status = StatusCode::from_u16(code).map_err(|_| StatusCodeError(code))?;
        Ok(Self::status(status, message))
    }

    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status == StatusCode::UNAUTHORIZED
    }

    /// The wrapped cause
    pub fn inner(&self) -> &anyhow::Error {
        &self.err
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.err, f)
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.err.source()
    }
}

/// Error returned by a fallible handler.
///
/// The variant is the classification: `App` errors are shown to the client with
/// their own status, `Internal` errors are opaque and map to 500.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl HandlerError {
    /// Treat any error as unclassified
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }

    pub fn as_app_error(&self) -> Option<&AppError> {
        match self {
            Self::App(e) => Some(e),
            Self::Internal(_) => None,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::App(e) => e.status_code(),
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message of the next error in the chain, if this one wraps another
    pub fn cause(&self) -> Option<String> {
        let source = match self {
            Self::App(e) => e.source(),
            Self::Internal(e) => e.source(),
        };
        source.map(ToString::to_string)
    }

    /// Backtrace, only when one was actually captured (RUST_BACKTRACE / RUST_LIB_BACKTRACE)
    pub fn stack_trace(&self) -> Option<String> {
        let err = match self {
            Self::App(e) => e.inner(),
            Self::Internal(e) => e,
        };
        let backtrace = err.backtrace();
        match backtrace.status() {
            BacktraceStatus::Captured => Some(backtrace.to_string()),
            _ => None,
        }
    }
}

pub type HandlerResult<T = axum::response::Response> = Result<T, HandlerError>;

/// Build an [`AppError`] with a status and a `format!` style message.
///
/// ```
/// use axum::http::StatusCode;
/// let err = httpx_adapter::status_error!(StatusCode::FORBIDDEN, "user {} may not edit", 42);
/// assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
/// assert_eq!(err.to_string(), "user 42 may not edit");
/// ```
#[macro_export]
macro_rules! status_error {
    ($status:expr, $($arg:tt)+) => {
        $crate::errors::AppError::status($status, format!($($arg)+))
    };
}

/// [`status_error!`] with 400 Bad Request
#[macro_export]
macro_rules! bad_request {
    ($($arg:tt)+) => {
        $crate::errors::AppError::bad_request(format!($($arg)+))
    };
}

/// [`status_error!`] with 401 Unauthorized
#[macro_export]
macro_rules! unauthorized {
    ($($arg:tt)+) => {
        $crate::errors::AppError::unauthorized(format!($($arg)+))
    };
}
