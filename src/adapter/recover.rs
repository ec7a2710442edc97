use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use futures::FutureExt;
use std::any::Any;
use std::error::Error as StdError;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::warn;

use super::{HandlerAdapter, RequestContext};
use crate::errors::HandlerError;
use crate::metrics::PANICS_RECOVERED_TOTAL;

/// Middleware that turns a panic anywhere below it into an internal error.
///
/// Install with `axum::middleware::from_fn_with_state(adapter, recover_panics)`.
/// The recovered error goes through the adapter's internal error path, so
/// clients see the same response as for a returned error.
pub async fn recover_panics(
    State(adapter): State<Arc<HandlerAdapter>>,
    request: Request,
    next: Next,
) -> Response {
    let ctx = RequestContext::from_request(&request);

    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(payload) => {
            let err = panic_to_error(payload);

            warn!(
                request_id = %ctx.request_id,
                method = %ctx.method,
                path = %ctx.path(),
                panic = %err,
                "Recovered from panic in handler"
            );
            PANICS_RECOVERED_TOTAL.inc();

            adapter.dispatch_internal(&ctx, err)
        }
    }
}

/// Convert a panic payload into an unclassified error.
///
/// String payloads keep their message and error payloads are passed through.
/// Anything else becomes "unknown panic".
pub fn panic_to_error(payload: Box<dyn Any + Send>) -> HandlerError {
    let payload = match payload.downcast::<String>() {
        Ok(message) => return HandlerError::internal(anyhow::Error::msg(*message)),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<&'static str>() {
        Ok(message) => return HandlerError::internal(anyhow::Error::msg(*message)),
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<HandlerError>() {
        Ok(err) => return *err,
        Err(payload) => payload,
    };
    let payload = match payload.downcast::<anyhow::Error>() {
        Ok(err) => return HandlerError::Internal(*err),
        Err(payload) => payload,
    };
    match payload.downcast::<Box<dyn StdError + Send + Sync>>() {
        Ok(err) => HandlerError::internal(anyhow::anyhow!(*err)),
        Err(_) => HandlerError::internal(anyhow::Error::msg("unknown panic")),
    }
}
