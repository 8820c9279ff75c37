//! Errors raised while installing logging or building the metrics registry.

use thiserror::Error;
use tracing_subscriber::util::TryInitError;

/// Result alias for telemetry operations.
pub type Result<T> = std::result::Result<T, TelemetryError>;

/// Failures surfaced by [`crate::init_logging`], [`crate::LogFormat`] parsing
/// and [`crate::Metrics`].
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A global subscriber was already installed.
    #[error("tracing subscriber could not be installed")]
    Subscriber {
        /// Error reported by `tracing-subscriber`.
        source: TryInitError,
    },
    /// `WARDEN_LOG_FORMAT` held something other than `json` or `pretty`.
    #[error("unknown log format '{value}'")]
    UnknownLogFormat {
        /// Label supplied by the caller.
        value: String,
    },
    /// A Warden counter could not be built or registered.
    #[error("metric '{metric}' could not be registered")]
    Metric {
        /// Counter name.
        metric: &'static str,
        /// Error reported by the Prometheus registry.
        source: prometheus::Error,
    },
    /// The `/metrics` exposition could not be rendered.
    #[error("metrics exposition could not be rendered")]
    Exposition {
        /// Error reported by the text encoder.
        source: prometheus::Error,
    },
}
