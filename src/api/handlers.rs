use anyhow::Context;
use axum::{
    extract::{Query, Request},
    http::{header, HeaderValue, StatusCode},
    response::Response,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::adapter::{default_app_error, AdapterFunc, RequestContext};
use crate::config::AppConfig;
use crate::errors::{HandlerError, HandlerResult};
use crate::{bad_request, status_error, unauthorized};

const DEMO_TOKEN: &str = "demo-token";

/// Liveness check
pub async fn health(_request: Request) -> HandlerResult<Json<Value>> {
    Ok(Json(json!({
        "status": "healthy",
        "service": "httpx-adapter",
        "version": env!("CARGO_PKG_VERSION"),
    })))
}

#[derive(Debug, Deserialize)]
pub struct GreetParams {
    pub name: Option<String>,
}

/// Succeeds with a greeting; 400 when `name` is missing
pub async fn greet(request: Request) -> HandlerResult<Json<Value>> {
    let Query(params) = Query::<GreetParams>::try_from_uri(request.uri())
        .map_err(|rejection| bad_request!("invalid query: {}", rejection.body_text()))?;

    let name = params
        .name
        .filter(|name| !name.trim().is_empty())
        .ok_or_else(|| bad_request!("missing query parameter `{}`", "name"))?;

    Ok(Json(json!({ "message": format!("hello, {}", name) })))
}

/// Requires `Authorization: Bearer demo-token`
pub async fn whoami(request: Request) -> HandlerResult<Json<Value>> {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| unauthorized!("missing bearer token"))?;

    if token != DEMO_TOKEN {
        return Err(unauthorized!("invalid bearer token").into());
    }

    Ok(Json(json!({ "user": "demo" })))
}

pub async fn forbidden(request: Request) -> HandlerResult {
    Err(status_error!(
        StatusCode::FORBIDDEN,
        "{} {} is not allowed for this account",
        request.method(),
        request.uri().path()
    )
    .into())
}

/// Fails with an unclassified error wrapping a lower-level cause
pub async fn internal(_request: Request) -> HandlerResult {
    Err::<Response, _>(anyhow::anyhow!("upstream timed out after 30s"))
        .context("loading dashboard")
        .map_err(HandlerError::from)
}

pub async fn explode(_request: Request) -> HandlerResult {
    panic!("boom")
}

/// Unauthorized strategy: render through the configured renderer and add a
/// `WWW-Authenticate` challenge
pub fn unauthorized_challenge(config: Arc<dyn AppConfig>) -> AdapterFunc {
    Arc::new(move |ctx: &RequestContext, err: HandlerError| {
        let mut response = match err {
            HandlerError::App(e) => config.renderer().render_app_error(ctx, &e),
            other => default_app_error(ctx, other),
        };
        response.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            HeaderValue::from_static("Bearer realm=\"httpx-adapter\""),
        );
        response
    })
}
