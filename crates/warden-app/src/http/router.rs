//! Router construction and server host.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::http::Request;
use axum::middleware::from_fn;
use axum::routing::get;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::{Span, info};
use warden_config::AppConfig;
use warden_telemetry::{Metrics, build_sha};

use crate::error::{AppError, AppResult};
use crate::http::gates::{basic_gate, layer, query_rule_gate, responder};
use crate::http::handlers;
use crate::http::telemetry::{HttpMetricsLayer, record_matched_path};
use crate::state::AppState;

/// Header carrying the per-request identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Axum router wrapper hosting the gated demo routes.
pub struct AppServer {
    router: Router,
}

impl AppServer {
    /// Build the router for `config`, recording into `metrics`.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured realm cannot be used in a challenge.
    pub fn new(config: &AppConfig, metrics: Metrics) -> AppResult<Self> {
        let responder = responder(config)?;
        let require_basic = layer(basic_gate(config), &responder, &metrics);
        let require_custom = layer(query_rule_gate(config.custom.clone()), &responder, &metrics);

        let trace_layer = TraceLayer::new_for_http()
            .make_span_with(|request: &Request<_>| {
                let request_id = request
                    .headers()
                    .get(HEADER_REQUEST_ID)
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("")
                    .to_string();
                tracing::info_span!(
                    "http.request",
                    method = %request.method(),
                    route = %request.uri().path(),
                    request_id = %request_id,
                    build_sha = %build_sha(),
                    status_code = tracing::field::Empty,
                    latency_ms = tracing::field::Empty
                )
            })
            .on_response(
                |response: &axum::response::Response, latency: Duration, span: &Span| {
                    span.record("status_code", response.status().as_u16());
                    let latency_ms = u64::try_from(latency.as_millis()).unwrap_or(u64::MAX);
                    span.record("latency_ms", latency_ms);
                },
            );
        let layered = ServiceBuilder::new()
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(trace_layer)
            .layer(HttpMetricsLayer::new(metrics.clone()));

        let router = Router::new()
            .route("/public", get(handlers::public))
            .route(
                "/protected",
                get(handlers::protected).route_layer(require_basic),
            )
            .route("/custom", get(handlers::custom).route_layer(require_custom))
            .route("/health", get(handlers::health))
            .route("/metrics", get(handlers::metrics))
            .route_layer(from_fn(record_matched_path))
            .layer(layered)
            .with_state(AppState::new(metrics));

        Ok(Self { router })
    }

    /// Router with every route and layer installed.
    #[must_use]
    pub const fn router(&self) -> &Router {
        &self.router
    }

    /// Serve on `addr` until the server stops.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener fails to bind or the server terminates unexpectedly.
    pub async fn serve(self, addr: SocketAddr) -> AppResult<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| AppError::Bind { addr, source })?;
        info!(%addr, "warden listening");
        axum::serve(listener, self.router.into_make_service())
            .await
            .map_err(|source| AppError::Serve { source })
    }
}
