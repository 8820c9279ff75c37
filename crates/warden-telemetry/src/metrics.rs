//! Prometheus-backed metrics registry and snapshot helpers.
//!
//! # Design
//! - Encapsulates collector registration to keep the public API small.
//! - Exposes the request and authorization counters relevant to Warden services.

use std::sync::Arc;

use prometheus::{IntCounter, IntCounterVec, Opts, Registry, TextEncoder};
use serde::Serialize;

use crate::error::{Result, TelemetryError};

/// Outcome label recorded when a gate lets a request through.
pub const OUTCOME_ALLOW: &str = "allow";
/// Outcome label recorded when a gate rejects a request.
pub const OUTCOME_DENY: &str = "deny";
/// Gate label recorded for requests no gate looked at.
pub const GATE_NONE: &str = "none";

/// Prometheus-backed metrics registry shared across services.
#[derive(Clone)]
pub struct Metrics {
    inner: Arc<MetricsInner>,
}

struct MetricsInner {
    registry: Registry,
    http_requests_total: IntCounterVec,
    auth_decisions_total: IntCounterVec,
    auth_allowed_total: IntCounter,
    auth_denied_total: IntCounter,
}

/// Snapshot of selected counters for health reporting.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct MetricsSnapshot {
    /// Requests any gate allowed through.
    pub auth_allowed_total: u64,
    /// Requests any gate rejected.
    pub auth_denied_total: u64,
}

impl Metrics {
    /// Construct a new metrics registry with the standard collectors registered.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the Prometheus collectors cannot be
    /// built or registered.
    pub fn new() -> Result<Self> {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new(
                "http_requests_total",
                "HTTP requests by route, status and the gate that saw them",
            ),
            &["route", "code", "gate"],
        )
        .map_err(|source| collector_error("http_requests_total", source))?;
        let auth_decisions_total = IntCounterVec::new(
            Opts::new(
                "auth_decisions_total",
                "Authorization decisions taken by gate and outcome",
            ),
            &["gate", "outcome"],
        )
        .map_err(|source| collector_error("auth_decisions_total", source))?;
        let auth_allowed_total = IntCounter::with_opts(Opts::new(
            "auth_allowed_total",
            "Requests allowed through any gate",
        ))
        .map_err(|source| collector_error("auth_allowed_total", source))?;
        let auth_denied_total = IntCounter::with_opts(Opts::new(
            "auth_denied_total",
            "Requests rejected by any gate",
        ))
        .map_err(|source| collector_error("auth_denied_total", source))?;

        register(&registry, "http_requests_total", &http_requests_total)?;
        register(&registry, "auth_decisions_total", &auth_decisions_total)?;
        register(&registry, "auth_allowed_total", &auth_allowed_total)?;
        register(&registry, "auth_denied_total", &auth_denied_total)?;

        Ok(Self {
            inner: Arc::new(MetricsInner {
                registry,
                http_requests_total,
                auth_decisions_total,
                auth_allowed_total,
                auth_denied_total,
            }),
        })
    }

    /// Count one served request; `gate` is [`GATE_NONE`] for ungated routes.
    pub fn inc_http_request(&self, route: &str, status: u16, gate: &str) {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string(), gate])
            .inc();
    }

    /// Current value of `http_requests_total` for one label set.
    #[must_use]
    pub fn http_requests(&self, route: &str, status: u16, gate: &str) -> u64 {
        self.inner
            .http_requests_total
            .with_label_values(&[route, &status.to_string(), gate])
            .get()
    }

    /// Record one gate decision; `allowed` selects the outcome label.
    pub fn inc_auth_decision(&self, gate: &str, allowed: bool) {
        let outcome = if allowed { OUTCOME_ALLOW } else { OUTCOME_DENY };
        self.inner
            .auth_decisions_total
            .with_label_values(&[gate, outcome])
            .inc();
        if allowed {
            self.inner.auth_allowed_total.inc();
        } else {
            self.inner.auth_denied_total.inc();
        }
    }

    /// Current value of `auth_decisions_total` for one gate/outcome pair.
    #[must_use]
    pub fn auth_decisions(&self, gate: &str, outcome: &str) -> u64 {
        self.inner
            .auth_decisions_total
            .with_label_values(&[gate, outcome])
            .get()
    }

    /// Render the metrics registry using the Prometheus text exposition format.
    ///
    /// # Errors
    ///
    /// Returns an error if the metrics cannot be encoded.
    pub fn render(&self) -> Result<String> {
        let mut rendered = String::new();
        TextEncoder::new()
            .encode_utf8(&self.inner.registry.gather(), &mut rendered)
            .map_err(|source| TelemetryError::Exposition { source })?;
        Ok(rendered)
    }

    /// Take a point-in-time snapshot of the authorization counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            auth_allowed_total: self.inner.auth_allowed_total.get(),
            auth_denied_total: self.inner.auth_denied_total.get(),
        }
    }
}

const fn collector_error(metric: &'static str, source: prometheus::Error) -> TelemetryError {
    TelemetryError::Metric { metric, source }
}

fn register<C>(registry: &Registry, metric: &'static str, collector: &C) -> Result<()>
where
    C: prometheus::core::Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .map_err(|source| collector_error(metric, source))
}
