//! Shared state handed to route handlers.

use warden_telemetry::Metrics;

/// Handles shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Metrics registry backing `/metrics` and `/health`.
    pub metrics: Metrics,
}

impl AppState {
    /// Wrap the shared metrics handle.
    #[must_use]
    pub const fn new(metrics: Metrics) -> Self {
        Self { metrics }
    }
}
