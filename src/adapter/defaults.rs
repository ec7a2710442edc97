use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::{AdapterFunc, HandlerAdapter, RequestContext};
use crate::config::AppConfig;
use crate::errors::{ErrorInfo, HandlerError};

/// Built-in client error strategy: the error's message with the error's status
pub fn default_app_error(_ctx: &RequestContext, err: HandlerError) -> Response {
    match err {
        HandlerError::App(e) => (e.status_code(), e.to_string()).into_response(),
        HandlerError::Internal(_) => (StatusCode::BAD_REQUEST, "Bad Request").into_response(),
    }
}

/// Built-in internal error strategy. Never leaks the error.
pub fn default_internal_error(_ctx: &RequestContext, _err: HandlerError) -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

/// Internal error strategy driven by `config`.
///
/// Reports the error, then renders a 500 through the configured renderer. The
/// diagnostic payload is only built in development mode.
pub fn internal_errors_handler(config: Arc<dyn AppConfig>) -> AdapterFunc {
    Arc::new(move |ctx: &RequestContext, err: HandlerError| {
        config.error_reporter().report(ctx, &err);

        let info = config.is_development().then(|| ErrorInfo {
            message: Some(err.to_string()),
            cause: err.cause(),
            stack: err.stack_trace(),
        });

        let mut response = config.renderer().render_internal_error(ctx, info.as_ref());
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    })
}

/// Client error strategy that renders through `config`'s renderer
pub fn app_errors_handler(config: Arc<dyn AppConfig>) -> AdapterFunc {
    Arc::new(move |ctx: &RequestContext, err: HandlerError| match err {
        HandlerError::App(e) => config.renderer().render_app_error(ctx, &e),
        other => default_app_error(ctx, other),
    })
}

impl HandlerAdapter {
    /// Config-driven internal errors, built-in client errors, no special 401 handling
    pub fn with_defaults(config: Arc<dyn AppConfig>) -> Self {
        Self {
            internal_errs: Some(internal_errors_handler(config)),
            client_errs: Some(Arc::new(default_app_error)),
            unauthorized_err: None,
        }
    }
}
