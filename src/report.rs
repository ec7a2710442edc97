//! Error reporting collaborators

use std::error::Error as StdError;
use tracing::error;

use crate::adapter::RequestContext;
use crate::errors::HandlerError;

/// Records internal errors somewhere an operator will see them
pub trait ErrorReporter: Send + Sync {
    fn report(&self, ctx: &RequestContext, err: &HandlerError);
}

/// Reports through `tracing` at error level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, ctx: &RequestContext, err: &HandlerError) {
        error!(
            request_id = %ctx.request_id,
            method = %ctx.method,
            path = %ctx.path(),
            error = %err,
            chain = %error_chain(err),
            "Unhandled error while serving request"
        );
    }
}

/// Every message in the source chain, outermost first, joined with ": "
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut messages = vec![err.to_string()];
    let mut source = err.source();
    while let Some(cause) = source {
        messages.push(cause.to_string());
        source = cause.source();
    }
    messages.join(": ")
}
