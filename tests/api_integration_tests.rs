use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::{IntoResponse, Response},
};
use httpx_adapter::adapter::{HandlerAdapter, RequestContext};
use httpx_adapter::api::routes::{build_adapter, create_router};
use httpx_adapter::config::{Environment, ErrorConfig, ErrorFormat, ErrorHandling};
use httpx_adapter::errors::HandlerError;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use tower::Service;

type Calls = Arc<Mutex<Vec<(&'static str, String, u16)>>>;

fn recorder(
    name: &'static str,
    calls: &Calls,
) -> impl Fn(&RequestContext, HandlerError) -> Response + Send + Sync + 'static {
    let calls = Arc::clone(calls);
    move |_ctx: &RequestContext, err: HandlerError| {
        calls
            .lock()
            .unwrap()
            .push((name, err.to_string(), err.status_code().as_u16()));
        (StatusCode::IM_A_TEAPOT, format!("handled by {}", name)).into_response()
    }
}

fn recording_adapter(
    calls: &Calls,
    unauthorized: bool,
    client: bool,
    internal: bool,
) -> HandlerAdapter {
    let mut adapter = HandlerAdapter::new();
    if unauthorized {
        adapter = adapter.with_unauthorized_err(recorder("unauthorized", calls));
    }
    if client {
        adapter = adapter.with_client_errs(recorder("client", calls));
    }
    if internal {
        adapter = adapter.with_internal_errs(recorder("internal", calls));
    }
    adapter
}

fn configured_app(environment: Environment) -> axum::Router {
    let handling = ErrorHandling::from_config(&ErrorConfig {
        environment,
        format: ErrorFormat::Json,
    });
    create_router(build_adapter(Arc::new(handling)))
}

// Helper to send request and return status, headers and raw body
async fn send_request(
    app: &mut axum::Router,
    uri: &str,
    headers: &[(&str, &str)],
) -> (StatusCode, axum::http::HeaderMap, String) {
    let mut builder = Request::builder().method("GET").uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::empty()).unwrap();

    let response = app.call(request).await.unwrap();
    let status = response.status();
    let response_headers = response.headers().clone();

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (
        status,
        response_headers,
        String::from_utf8(body.to_vec()).unwrap(),
    )
}

async fn send_json_request(app: &mut axum::Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = send_request(app, uri, &[]).await;
    (status, serde_json::from_str(&body).unwrap_or(json!({})))
}

// ========== DISPATCH RULES ==========

#[tokio::test]
async fn test_success_invokes_no_strategy() {
    let calls = Calls::default();
    let mut app = create_router(recording_adapter(&calls, true, true, true));

    let (status, body) = send_json_request(&mut app, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_401_goes_to_unauthorized_strategy() {
    let calls = Calls::default();
    let mut app = create_router(recording_adapter(&calls, true, true, true));

    let (status, _, body) = send_request(&mut app, "/demo/whoami", &[]).await;

    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert_eq!(body, "handled by unauthorized");
    assert_eq!(
        *calls.lock().unwrap(),
        vec![("unauthorized", "missing bearer token".to_string(), 401)]
    );
}

#[tokio::test]
async fn test_401_without_unauthorized_strategy_uses_client_strategy() {
    let calls = Calls::default();
    let mut app = create_router(recording_adapter(&calls, false, true, true));

    send_request(&mut app, "/demo/whoami", &[("authorization", "Bearer wrong")]).await;

    assert_eq!(
        *calls.lock().unwrap(),
        vec![("client", "invalid bearer token".to_string(), 401)]
    );
}

#[tokio::test]
async fn test_403_without_strategies_uses_default() {
    let calls = Calls::default();
    let mut app = create_router(recording_adapter(&calls, false, false, true));

    let (status, _, body) = send_request(&mut app, "/demo/forbidden", &[]).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, "GET /demo/forbidden is not allowed for this account");
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_400_goes_to_client_strategy() {
    let calls = Calls::default();
    let mut app = create_router(recording_adapter(&calls, true, true, true));

    send_request(&mut app, "/demo/greet", &[]).await;

    assert_eq!(
        *calls.lock().unwrap(),
        vec![("client", "missing query parameter `name`".to_string(), 400)]
    );
}

#[tokio::test]
async fn test_internal_without_strategy_uses_default() {
    let mut app = create_router(HandlerAdapter::new());

    let (status, _, body) = send_request(&mut app, "/demo/internal", &[]).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error");
}

#[tokio::test]
async fn test_internal_goes_to_internal_strategy() {
    let calls = Calls::default();
    let mut app = create_router(recording_adapter(&calls, true, true, true));

    let (status, _, body) = send_request(&mut app, "/demo/internal", &[]).await;

    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert!(!body.contains("Internal Server Error"));
    assert_eq!(
        *calls.lock().unwrap(),
        vec![("internal", "loading dashboard".to_string(), 500)]
    );
}

// ========== PANIC RECOVERY ==========

#[tokio::test]
async fn test_panic_routed_to_internal_strategy() {
    let calls = Calls::default();
    let mut app = create_router(recording_adapter(&calls, true, true, true));

    let (status, _, _) = send_request(&mut app, "/demo/panic", &[]).await;

    assert_eq!(status, StatusCode::IM_A_TEAPOT);
    assert_eq!(
        *calls.lock().unwrap(),
        vec![("internal", "boom".to_string(), 500)]
    );
}

#[tokio::test]
async fn test_panic_without_internal_strategy() {
    let mut app = create_router(HandlerAdapter::new());

    let (status, _, body) = send_request(&mut app, "/demo/panic", &[]).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, "Internal Server Error");
}

// ========== CONFIGURED STACK ==========

#[tokio::test]
async fn test_development_mode_includes_diagnostics() {
    let mut app = configured_app(Environment::Development);

    let (status, body) = send_json_request(&mut app, "/demo/internal").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
    assert_eq!(body["error"]["message"], "Internal Server Error");
    assert_eq!(body["error"]["details"]["message"], "loading dashboard");
    assert_eq!(
        body["error"]["details"]["cause"],
        "upstream timed out after 30s"
    );
}

#[tokio::test]
async fn test_production_mode_hides_diagnostics() {
    let mut app = configured_app(Environment::Production);

    let (status, _, body) = send_request(&mut app, "/demo/internal", &[]).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body.contains("upstream"));
    assert!(!body.contains("details"));
}

#[tokio::test]
async fn test_production_mode_panic_renders_json() {
    let mut app = configured_app(Environment::Production);

    let (status, body) = send_json_request(&mut app, "/demo/panic").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "INTERNAL_ERROR");
}

#[tokio::test]
async fn test_configured_unauthorized_challenge() {
    let mut app = configured_app(Environment::Production);

    let (status, headers, body) = send_request(&mut app, "/demo/whoami", &[]).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(headers.contains_key(header::WWW_AUTHENTICATE));
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "missing bearer token");
}

#[tokio::test]
async fn test_configured_client_error_json() {
    let mut app = configured_app(Environment::Production);

    let (status, body) = send_json_request(&mut app, "/demo/greet?name=").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert_eq!(body["error"]["message"], "missing query parameter `name`");
}

#[tokio::test]
async fn test_authorized_request_succeeds() {
    let mut app = configured_app(Environment::Production);

    let (status, headers, body) = send_request(
        &mut app,
        "/demo/whoami",
        &[("authorization", "Bearer demo-token")],
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!headers.contains_key(header::WWW_AUTHENTICATE));
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["user"], "demo");
}

#[tokio::test]
async fn test_greet_success() {
    let mut app = configured_app(Environment::Production);

    let (status, body) = send_json_request(&mut app, "/demo/greet?name=Ada").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "hello, Ada");
}

// ========== AMBIENT ==========

#[tokio::test]
async fn test_request_id_propagates_to_error_body() {
    let mut app = configured_app(Environment::Production);

    let (_, headers, body) = send_request(
        &mut app,
        "/demo/forbidden",
        &[("x-request-id", "trace-123")],
    )
    .await;

    assert_eq!(headers["x-request-id"], "trace-123");
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"]["request_id"], "trace-123");
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_metrics_endpoint_reports_dispatches() {
    let mut app = configured_app(Environment::Production);

    send_request(&mut app, "/demo/forbidden", &[]).await;
    let (status, _, body) = send_request(&mut app, "/metrics", &[]).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("http_errors_dispatched_total"));
    assert!(body.contains("http_requests_total"));
}
