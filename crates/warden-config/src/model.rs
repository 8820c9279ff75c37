//! Typed configuration models.

use std::fmt;
use std::net::SocketAddr;

use warden_auth::ErrorStyle;
use warden_telemetry::LogFormat;

/// Runtime settings for the host binary and the gates it mounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Listener address.
    pub bind_addr: SocketAddr,
    /// Identity expected by the static credential gate.
    pub identity: IdentityConfig,
    /// Failure payload shape.
    pub error_style: ErrorStyle,
    /// Realm advertised in the `WWW-Authenticate` challenge, if any.
    pub realm: Option<String>,
    /// Query pair that unlocks the custom gate.
    pub custom: CustomRule,
    /// Logging output settings.
    pub logging: LogSettings,
}

/// Username/password pair expected by the static gate.
#[derive(Clone, PartialEq, Eq)]
pub struct IdentityConfig {
    /// Expected username, compared by exact equality.
    pub username: String,
    /// Expected password, compared by exact equality.
    pub password: String,
}

impl IdentityConfig {
    /// True when either half is empty; such an identity can never be matched.
    #[must_use]
    pub fn has_empty_field(&self) -> bool {
        self.username.is_empty() || self.password.is_empty()
    }
}

impl fmt::Debug for IdentityConfig {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("IdentityConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Query parameter/value pair consulted by the custom demo gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomRule {
    /// Query parameter name.
    pub param: String,
    /// Value the parameter must equal.
    pub value: String,
}

/// Logging settings resolved from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    /// Fallback filter directive.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_debug_redacts_password() {
        let identity = IdentityConfig {
            username: "bob".to_string(),
            password: "bobisthebest".to_string(),
        };
        let rendered = format!("{identity:?}");
        assert!(rendered.contains("bob"));
        assert!(!rendered.contains("bobisthebest"));
        assert!(!identity.has_empty_field());
    }
}
