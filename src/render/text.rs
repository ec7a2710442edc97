use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::Renderer;
use crate::adapter::RequestContext;
use crate::errors::{AppError, ErrorInfo};

/// Plain-text bodies, same shape as the built-in defaults
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextRenderer;

impl Renderer for PlainTextRenderer {
    fn render_internal_error(&self, _ctx: &RequestContext, info: Option<&ErrorInfo>) -> Response {
        let mut body = String::from("Internal Server Error");

        if let Some(info) = info {
            for (label, value) in [
                ("message", &info.message),
                ("cause", &info.cause),
                ("stack", &info.stack),
            ] {
                if let Some(value) = value {
                    body.push_str(&format!("\n{}: {}", label, value));
                }
            }
        }

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }

    fn render_app_error(&self, _ctx: &RequestContext, err: &AppError) -> Response {
        (err.status_code(), err.to_string()).into_response()
    }
}
