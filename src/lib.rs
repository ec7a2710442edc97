//! Error routing for axum handlers.
//!
//! Handlers return `Result<impl IntoResponse, HandlerError>`; a
//! [`HandlerAdapter`](adapter::HandlerAdapter) turns them into ordinary axum
//! handlers and decides how each error is rendered.

pub mod adapter;
pub mod api;
pub mod config;
pub mod errors;
pub mod metrics;
pub mod render;
pub mod report;

pub use adapter::{AdapterFunc, HandlerAdapter, RequestContext};
pub use errors::{AppError, HandlerError, HandlerResult};
