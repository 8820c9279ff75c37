//! Shared HTTP constants (challenge scheme, error tags, messages).

/// Authentication scheme named in the challenge header and accepted by the parser.
pub const BASIC_SCHEME: &str = "Basic";
/// Message carried by every failure payload, whatever the deny reason.
pub const AUTH_FAILED_MESSAGE: &str = "Authentication Failed";
/// Error category surfaced by the structured payload.
pub const ERROR_TYPE_CLIENT: &str = "client";
/// Stable error name surfaced by the structured payload.
pub const ERROR_NAME_UNAUTHORIZED: &str = "ErrorUnauthorized";
/// Gate label recorded for the static credential gate.
pub const GATE_BASIC: &str = "basic";
/// Gate label recorded for the custom authorization gate.
pub const GATE_CUSTOM: &str = "custom";
