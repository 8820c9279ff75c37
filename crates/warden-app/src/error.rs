//! # Design
//!
//! - Centralize errors raised while booting and serving the host binary.
//! - Keep messages constant; the operation identifier carries the context.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: warden_config::ConfigError,
    },
    /// Logging or metrics could not be set up.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: warden_telemetry::TelemetryError,
    },
    /// A configured value was rejected while building the router.
    #[error("invalid configuration")]
    InvalidConfig {
        /// Field name that failed validation.
        field: &'static str,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The listener could not be bound.
    #[error("failed to bind listener")]
    Bind {
        /// Address that could not be bound.
        addr: SocketAddr,
        /// Source IO error.
        source: io::Error,
    },
    /// The server stopped with an error.
    #[error("http server terminated unexpectedly")]
    Serve {
        /// Source IO error.
        source: io::Error,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: warden_config::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: warden_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }
}
