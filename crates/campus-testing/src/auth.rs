//! Session helpers for HTTP tests.
//!
//! Handlers read the login token from `x-campus-session`. These helpers build
//! requests carrying it, so tests can act as a logged-in user.

use axum::body::Body;
use axum::http::{Method, Request, header};
use http_body_util::BodyExt;
use serde_json::Value;

use campus_core::session::SESSION_HEADER;
use campus_domain::id::SessionToken;

/// Request with an optional session and an optional JSON body.
pub fn request(
    method: Method,
    uri: &str,
    token: Option<&SessionToken>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(SESSION_HEADER, token.to_string());
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    builder.body(body).expect("valid test request")
}

/// Collect a response body as JSON. An empty body reads as `Value::Null`.
pub async fn body_json(body: Body) -> Value {
    let bytes = body
        .collect()
        .await
        .expect("readable response body")
        .to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).expect("JSON response body")
}
