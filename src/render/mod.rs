//! Response renderers used by the config-driven strategies

pub mod json;
pub mod text;

use axum::response::Response;

use crate::adapter::RequestContext;
use crate::errors::{AppError, ErrorInfo};

pub use json::JsonRenderer;
pub use text::PlainTextRenderer;

/// Writes error responses.
///
/// `info` is only present in development mode.
pub trait Renderer: Send + Sync {
    fn render_internal_error(&self, ctx: &RequestContext, info: Option<&ErrorInfo>) -> Response;

    fn render_app_error(&self, ctx: &RequestContext, err: &AppError) -> Response;
}
