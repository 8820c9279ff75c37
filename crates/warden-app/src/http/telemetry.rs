//! Request counting attributed to the route and the gate that answered.
//!
//! The counting layer wraps the whole router, so it runs before routing and
//! never sees `MatchedPath` on the request. [`record_matched_path`] runs inside
//! the router and copies the matched route onto the response instead; gated
//! routes already carry a [`GateOutcome`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use axum::extract::{MatchedPath, Request as AxumRequest};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tower::{Layer, Service};
use warden_auth::GateOutcome;
use warden_telemetry::{GATE_NONE, Metrics};

/// Route label for requests that matched no route.
pub(crate) const ROUTE_UNMATCHED: &str = "unmatched";

/// Route-level middleware exposing the matched route to outer layers.
pub(crate) async fn record_matched_path(req: AxumRequest, next: Next) -> Response {
    let matched = req.extensions().get::<MatchedPath>().cloned();
    let mut response = next.run(req).await;
    if let Some(matched) = matched {
        response.extensions_mut().insert(matched);
    }
    response
}

/// Counts every response in `http_requests_total{route,code,gate}`.
#[derive(Clone)]
pub(crate) struct HttpMetricsLayer {
    metrics: Metrics,
}

impl HttpMetricsLayer {
    pub(crate) const fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}

impl<S> Layer<S> for HttpMetricsLayer {
    type Service = HttpMetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        HttpMetricsService {
            inner,
            metrics: self.metrics.clone(),
        }
    }
}

#[derive(Clone)]
pub(crate) struct HttpMetricsService<S> {
    inner: S,
    metrics: Metrics,
}

impl<S, B> Service<Request<B>> for HttpMetricsService<S>
where
    S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
    B: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        let metrics = self.metrics.clone();
        let pending = self.inner.call(req);

        Box::pin(async move {
            let response = pending.await?;
            let route = response
                .extensions()
                .get::<MatchedPath>()
                .map_or(ROUTE_UNMATCHED, MatchedPath::as_str);
            let gate = response
                .extensions()
                .get::<GateOutcome>()
                .map_or(GATE_NONE, |outcome| outcome.gate);
            metrics.inc_http_request(route, response.status().as_u16(), gate);
            Ok(response)
        })
    }
}
