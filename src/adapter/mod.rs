//! Turns fallible handlers into plain axum handlers.
//!
//! A handler wrapped with [`HandlerAdapter::handle`] returns
//! `Result<impl IntoResponse, HandlerError>`. On error, the adapter picks one of
//! three strategies:
//!
//! | error                              | strategy                                   |
//! |------------------------------------|--------------------------------------------|
//! | `App` with 401, `unauthorized_err` set | `unauthorized_err`                     |
//! | any other `App`                    | `client_errs`, else [`default_app_error`]  |
//! | `Internal`                         | `internal_errs`, else [`default_internal_error`] |

pub mod context;
pub mod defaults;
pub mod recover;

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use futures::future::{BoxFuture, FutureExt};
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tracing::debug;

use crate::errors::HandlerError;
use crate::metrics::ERRORS_DISPATCHED_TOTAL;

pub use context::{RequestContext, RequestId};
pub use defaults::{
    app_errors_handler, default_app_error, default_internal_error, internal_errors_handler,
};
pub use recover::recover_panics;

/// Renders one category of error into a complete response
pub type AdapterFunc = Arc<dyn Fn(&RequestContext, HandlerError) -> Response + Send + Sync>;

/// Which path an error took through [`HandlerAdapter::dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    Unauthorized,
    Client,
    Internal,
}

impl ErrorClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "unauthorized",
            Self::Client => "client",
            Self::Internal => "internal",
        }
    }

    fn default_strategy(&self) -> fn(&RequestContext, HandlerError) -> Response {
        match self {
            Self::Unauthorized | Self::Client => default_app_error,
            Self::Internal => default_internal_error,
        }
    }
}

/// Strategy slots for each error category. Unset slots use the built-in defaults.
///
/// Build it once at startup; it is only read afterwards, so one instance can
/// serve every request concurrently.
#[derive(Clone, Default)]
pub struct HandlerAdapter {
    /// Unclassified errors
    pub internal_errs: Option<AdapterFunc>,
    /// `AppError`s not handled by `unauthorized_err`
    pub client_errs: Option<AdapterFunc>,
    /// `AppError`s with status 401
    pub unauthorized_err: Option<AdapterFunc>,
}

impl fmt::Debug for HandlerAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerAdapter")
            .field("internal_errs", &self.internal_errs.is_some())
            .field("client_errs", &self.client_errs.is_some())
            .field("unauthorized_err", &self.unauthorized_err.is_some())
            .finish()
    }
}

impl HandlerAdapter {
    /// Adapter with no strategies; every error goes to the built-in defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_internal_errs<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestContext, HandlerError) -> Response + Send + Sync + 'static,
    {
        self.internal_errs = Some(Arc::new(f));
        self
    }

    pub fn with_client_errs<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestContext, HandlerError) -> Response + Send + Sync + 'static,
    {
        self.client_errs = Some(Arc::new(f));
        self
    }

    pub fn with_unauthorized_err<F>(mut self, f: F) -> Self
    where
        F: Fn(&RequestContext, HandlerError) -> Response + Send + Sync + 'static,
    {
        self.unauthorized_err = Some(Arc::new(f));
        self
    }

    /// Classify `err` and render it with the matching strategy
    pub fn dispatch(&self, ctx: &RequestContext, err: HandlerError) -> Response {
        let (class, strategy) = match &err {
            HandlerError::App(app) if app.is_unauthorized() && self.unauthorized_err.is_some() => {
                (ErrorClass::Unauthorized, self.unauthorized_err.as_ref())
            }
            HandlerError::App(_) => (ErrorClass::Client, self.client_errs.as_ref()),
            HandlerError::Internal(_) => (ErrorClass::Internal, self.internal_errs.as_ref()),
        };

        debug!(
            request_id = %ctx.request_id,
            path = %ctx.path(),
            class = class.as_str(),
            status = err.status_code().as_u16(),
            configured = strategy.is_some(),
            "Dispatching handler error"
        );
        ERRORS_DISPATCHED_TOTAL
            .with_label_values(&[class.as_str()])
            .inc();

        match strategy {
            Some(render) => render(ctx, err),
            None => (class.default_strategy())(ctx, err),
        }
    }

    /// Send an error down the internal path regardless of its variant
    pub fn dispatch_internal(&self, ctx: &RequestContext, err: HandlerError) -> Response {
        ERRORS_DISPATCHED_TOTAL
            .with_label_values(&[ErrorClass::Internal.as_str()])
            .inc();

        match &self.internal_errs {
            Some(render) => render(ctx, err),
            None => default_internal_error(ctx, err),
        }
    }

    /// Wrap a fallible handler into one axum can route to.
    ///
    /// A successful result is returned untouched; errors go through
    /// [`dispatch`](Self::dispatch).
    pub fn handle<H, Fut, R>(
        &self,
        handler: H,
    ) -> impl Fn(Request) -> BoxFuture<'static, Response> + Clone + Send + Sync + 'static
    where
        H: Fn(Request) -> Fut + Clone + Send + Sync + 'static,
        Fut: Future<Output = Result<R, HandlerError>> + Send + 'static,
        R: IntoResponse + 'static,
    {
        let adapter = Arc::new(self.clone());

        move |request: Request| -> BoxFuture<'static, Response> {
            let adapter = Arc::clone(&adapter);
            let handler = handler.clone();

            async move {
                let ctx = RequestContext::from_request(&request);
                match handler(request).await {
                    Ok(response) => response.into_response(),
                    Err(err) => adapter.dispatch(&ctx, err),
                }
            }
            .boxed()
        }
    }
}
