//! Error model: classified application errors and structured error bodies

pub mod app_error;
pub mod codes;
pub mod response;

pub use app_error::{AppError, HandlerError, HandlerResult, StatusCodeError};
pub use codes::ErrorCode;
pub use response::{ErrorDetail, ErrorInfo, ErrorResponse};
