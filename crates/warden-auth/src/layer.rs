//! Tower adapter that runs a [`Gate`] in front of an inner service.
//!
//! # Design
//! - The gate decides before the inner service is touched; a deny never reaches it.
//! - Allowed requests get the inner response back unchanged.
//! - Decisions are logged and counted; credentials never appear in either.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context as TaskContext, Poll};

use axum::extract::{Request as AxumRequest, State};
use axum::http::Request;
use axum::middleware::Next;
use axum::response::Response;
use tower::{Layer, Service};
use tracing::{debug, info, warn};
use warden_telemetry::Metrics;

use crate::error::AuthError;
use crate::gate::{Decision, Gate};
use crate::responder::FailureResponder;

/// Future resolving to `Ok(())` when the request may proceed, or the 401 to send.
pub type AdmitFuture = Pin<Box<dyn Future<Output = Result<(), Response>> + Send + 'static>>;

/// Response extension naming the gate that decided a request.
///
/// Set on both the 401 and on responses the gate let through, so outer
/// layers can attribute a response to its gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateOutcome {
    /// [`Gate::name`] of the deciding gate.
    pub gate: &'static str,
    /// True when the request reached the inner service.
    pub allowed: bool,
}

impl GateOutcome {
    fn stamp(self, mut response: Response) -> Response {
        response.extensions_mut().insert(self);
        response
    }
}

/// A gate bundled with the responder and metrics handle it reports through.
pub struct GateGuard<G> {
    gate: Arc<G>,
    responder: FailureResponder,
    metrics: Option<Metrics>,
}

impl<G: Gate> GateGuard<G> {
    /// Guard with the default responder and no metrics.
    #[must_use]
    pub fn new(gate: G) -> Self {
        Self {
            gate: Arc::new(gate),
            responder: FailureResponder::default(),
            metrics: None,
        }
    }

    /// Wrapped gate.
    #[must_use]
    pub fn gate(&self) -> &G {
        &self.gate
    }

    /// Responder used for denied requests.
    #[must_use]
    pub const fn responder(&self) -> &FailureResponder {
        &self.responder
    }

    /// Evaluate the gate for `request` and map the decision to a pipeline outcome.
    ///
    /// The 401 carries a [`GateOutcome`] extension.
    pub fn admit<B>(self: &Arc<Self>, request: &Request<B>) -> AdmitFuture {
        let pending = self.gate.evaluate(request);
        let guard = Arc::clone(self);
        Box::pin(async move {
            let decision = pending.await;
            guard.record(&decision);
            match decision {
                Decision::Allow => Ok(()),
                Decision::Deny(error) => {
                    Err(guard.outcome(false).stamp(guard.responder.respond(&error)))
                }
            }
        })
    }

    /// Extension value describing a decision by this guard's gate.
    #[must_use]
    pub fn outcome(&self, allowed: bool) -> GateOutcome {
        GateOutcome {
            gate: self.gate.name(),
            allowed,
        }
    }

    fn record(&self, decision: &Decision) {
        let gate = self.gate.name();
        match decision {
            Decision::Allow => debug!(gate, outcome = "allow", "request admitted"),
            Decision::Deny(error @ AuthError::DecisionFailed { source }) => warn!(
                gate,
                outcome = "deny",
                reason = error.reason(),
                error = %source,
                "authorization decision failed"
            ),
            Decision::Deny(error) => info!(
                gate,
                outcome = "deny",
                reason = error.reason(),
                "request rejected"
            ),
        }
        if let Some(metrics) = &self.metrics {
            metrics.inc_auth_decision(gate, decision.is_allow());
        }
    }
}

impl<G> fmt::Debug for GateGuard<G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("GateGuard")
            .field("responder", &self.responder)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

/// Layer installing a gate in front of every wrapped service.
///
/// Builders only touch this layer's own settings; clones and guards taken
/// earlier keep what they were built with.
pub struct GateLayer<G> {
    gate: Arc<G>,
    responder: FailureResponder,
    metrics: Option<Metrics>,
}

impl<G: Gate> GateLayer<G> {
    /// Layer for `gate` with a minimal-style responder and no metrics.
    #[must_use]
    pub fn new(gate: G) -> Self {
        Self {
            gate: Arc::new(gate),
            responder: FailureResponder::default(),
            metrics: None,
        }
    }
}

impl<G> GateLayer<G> {
    /// Replace the responder used for denied requests.
    #[must_use]
    pub fn with_responder(mut self, responder: FailureResponder) -> Self {
        self.responder = responder;
        self
    }

    /// Count decisions in `auth_decisions_total`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Guard carrying the current settings, usable as state for [`require_gate`].
    #[must_use]
    pub fn guard(&self) -> Arc<GateGuard<G>> {
        Arc::new(GateGuard {
            gate: Arc::clone(&self.gate),
            responder: self.responder.clone(),
            metrics: self.metrics.clone(),
        })
    }
}

impl<G> Clone for GateLayer<G> {
    fn clone(&self) -> Self {
        Self {
            gate: Arc::clone(&self.gate),
            responder: self.responder.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<G> fmt::Debug for GateLayer<G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("GateLayer")
            .field("responder", &self.responder)
            .field("metrics", &self.metrics.is_some())
            .finish_non_exhaustive()
    }
}

impl<S, G> Layer<S> for GateLayer<G> {
    type Service = GateService<S, G>;

    fn layer(&self, inner: S) -> Self::Service {
        GateService {
            inner,
            guard: self.guard(),
        }
    }
}

/// Service produced by [`GateLayer`].
pub struct GateService<S, G> {
    inner: S,
    guard: Arc<GateGuard<G>>,
}

impl<S: Clone, G> Clone for GateService<S, G> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            guard: Arc::clone(&self.guard),
        }
    }
}

impl<S, G> fmt::Debug for GateService<S, G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("GateService")
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

impl<S, G, B> Service<Request<B>> for GateService<S, G>
where
    S: Service<Request<B>, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send,
    G: Gate,
    B: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut TaskContext<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<B>) -> Self::Future {
        // Keep the service that was polled ready; leave a fresh clone behind.
        let fresh = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, fresh);
        let admission = self.guard.admit(&req);
        let admitted = self.guard.outcome(true);

        Box::pin(async move {
            match admission.await {
                Ok(()) => inner
                    .call(req)
                    .await
                    .map(|response| admitted.stamp(response)),
                Err(denied) => Ok(denied),
            }
        })
    }
}

/// `axum::middleware::from_fn_with_state` entry point for a shared guard.
pub async fn require_gate<G: Gate>(
    State(guard): State<Arc<GateGuard<G>>>,
    req: AxumRequest,
    next: Next,
) -> Response {
    match guard.admit(&req).await {
        Ok(()) => guard.outcome(true).stamp(next.run(req).await),
        Err(denied) => denied,
    }
}
