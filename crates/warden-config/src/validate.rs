//! Validation helpers and parsing utilities for environment values.

use std::net::SocketAddr;

use warden_auth::ErrorStyle;
use warden_telemetry::LogFormat;

use crate::error::{ConfigError, ConfigResult};

/// Treat blank values as unset.
#[must_use]
pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}

/// Parse a listener address.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when `value` is not `host:port`.
pub fn parse_bind_addr(field: &'static str, value: &str) -> ConfigResult<SocketAddr> {
    value.parse().map_err(|_| ConfigError::InvalidField {
        field,
        value: value.to_string(),
        reason: "must be a socket address",
    })
}

/// Parse an error style label.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for anything other than `minimal`/`structured`.
pub fn parse_error_style(field: &'static str, value: &str) -> ConfigResult<ErrorStyle> {
    value.parse().map_err(|_| ConfigError::InvalidField {
        field,
        value: value.to_string(),
        reason: "must be 'minimal' or 'structured'",
    })
}

/// Parse a log format label.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] for anything other than `json`/`pretty`.
pub fn parse_log_format(field: &'static str, value: &str) -> ConfigResult<LogFormat> {
    value.parse().map_err(|_| ConfigError::InvalidField {
        field,
        value: value.to_string(),
        reason: "must be 'json' or 'pretty'",
    })
}

/// Realms are emitted inside a quoted-string; quotes and control characters are rejected.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidField`] when the realm cannot be quoted safely.
pub fn validate_realm(field: &'static str, value: &str) -> ConfigResult<String> {
    if value
        .chars()
        .any(|ch| ch == '"' || ch == '\\' || ch.is_control() || !ch.is_ascii())
    {
        return Err(ConfigError::InvalidField {
            field,
            value: value.to_string(),
            reason: "must be printable ASCII without quotes or backslashes",
        });
    }
    Ok(value.to_string())
}
