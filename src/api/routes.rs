use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{explode, forbidden, greet, health, internal, unauthorized_challenge, whoami};
use super::middleware::logging_middleware;
use crate::adapter::{app_errors_handler, internal_errors_handler, recover_panics, HandlerAdapter};
use crate::config::AppConfig;
use crate::metrics;

/// Adapter used by the server: every strategy renders through `config`, 401s
/// get a `WWW-Authenticate` challenge
pub fn build_adapter(config: Arc<dyn AppConfig>) -> HandlerAdapter {
    HandlerAdapter {
        internal_errs: Some(internal_errors_handler(config.clone())),
        client_errs: Some(app_errors_handler(config.clone())),
        unauthorized_err: Some(unauthorized_challenge(config)),
    }
}

pub fn create_router(adapter: HandlerAdapter) -> Router {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let adapter = Arc::new(adapter);

    Router::new()
        // Health check
        .route("/health", get(adapter.handle(health)))
        // Demo endpoints, one per error path
        .route("/demo/greet", get(adapter.handle(greet)))
        .route("/demo/whoami", get(adapter.handle(whoami)))
        .route("/demo/forbidden", get(adapter.handle(forbidden)))
        .route("/demo/internal", get(adapter.handle(internal)))
        .route("/demo/panic", get(adapter.handle(explode)))
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(adapter.handle(metrics::metrics_handler)))
        // Add middleware (order matters: trace -> cors -> logging -> metrics -> recover)
        .layer(middleware::from_fn_with_state(adapter, recover_panics))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(middleware::from_fn(logging_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
