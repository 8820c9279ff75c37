//! Route bodies. Gating happens in layers; handlers only run once admitted.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use tracing::error;
use warden_telemetry::{MetricsSnapshot, build_sha};

use crate::state::AppState;

/// Body of `/public`.
#[derive(Debug, Serialize)]
pub struct PublicPage {
    /// Always `true`.
    pub public_page: bool,
}

/// Body of `/protected`.
#[derive(Debug, Serialize)]
pub struct ProtectedPage {
    /// Always `true`.
    pub protected_page: bool,
}

/// Body of `/custom`.
#[derive(Debug, Serialize)]
pub struct CustomPage {
    /// Always `true`.
    pub custom_page: bool,
}

/// Body of `/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `ok` while the process is serving.
    pub status: &'static str,
    /// Build identifier recorded at startup.
    pub build: &'static str,
    /// Gate decision totals.
    pub auth: MetricsSnapshot,
}

pub(crate) async fn public() -> Json<PublicPage> {
    Json(PublicPage { public_page: true })
}

pub(crate) async fn protected() -> Json<ProtectedPage> {
    Json(ProtectedPage {
        protected_page: true,
    })
}

pub(crate) async fn custom() -> Json<CustomPage> {
    Json(CustomPage { custom_page: true })
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        build: build_sha(),
        auth: state.metrics.snapshot(),
    })
}

pub(crate) async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.render() {
        Ok(body) => (
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            Body::from(body),
        )
            .into_response(),
        Err(err) => {
            error!(error = %err, "failed to render metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
