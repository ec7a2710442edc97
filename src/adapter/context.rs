use axum::{
    extract::Request,
    http::{HeaderMap, Method, Uri},
};
use uuid::Uuid;

/// Request id assigned by the logging middleware, stored as a request extension
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

/// What strategies and collaborators get to see of the request.
///
/// Captured before the fallible handler takes ownership of the request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    pub uri: Uri,
    pub headers: HeaderMap,
    pub request_id: String,
}

impl RequestContext {
    pub fn from_request(request: &Request) -> Self {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .map(|id| id.0.clone())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
            request_id,
        }
    }

    pub fn path(&self) -> &str {
        self.uri.path()
    }
}
