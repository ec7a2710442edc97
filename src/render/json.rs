use axum::response::{IntoResponse, Response};

use super::Renderer;
use crate::adapter::RequestContext;
use crate::errors::{AppError, ErrorInfo, ErrorResponse};

/// Renders [`ErrorResponse`] bodies
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render_internal_error(&self, ctx: &RequestContext, info: Option<&ErrorInfo>) -> Response {
        ErrorResponse::internal_error(ctx.request_id.clone())
            .with_details(info.cloned())
            .into_response()
    }

    fn render_app_error(&self, ctx: &RequestContext, err: &AppError) -> Response {
        ErrorResponse::new(err.status_code(), err.to_string(), ctx.request_id.clone())
            .into_response()
    }
}
