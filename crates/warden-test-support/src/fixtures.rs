//! Request fixtures.

use axum::body::Body;
use axum::http::Request;
use axum::http::header::AUTHORIZATION;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// `Authorization` value carrying `username:password` in the Basic scheme.
#[must_use]
pub fn basic_header(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

/// Empty-bodied `GET` request for `uri`.
///
/// # Errors
///
/// Returns an error when `uri` is not a valid request target.
pub fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().uri(uri).body(Body::empty())?)
}

/// `GET` request for `uri` carrying Basic credentials.
///
/// # Errors
///
/// Returns an error when `uri` is not a valid request target.
pub fn get_with_basic(uri: &str, username: &str, password: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, basic_header(username, password))
        .body(Body::empty())?)
}
