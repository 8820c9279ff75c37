//! JSON payloads emitted by the failure responder.
//!
//! Field order matches the wire format: `type`, `name`, `message`.

use serde::{Deserialize, Serialize};

/// Top-level failure document: `{"error": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// Error details.
    pub error: ErrorPayload,
}

/// Error details; `type` and `name` are only present in the structured style.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorPayload {
    /// Error category (`client`).
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Stable error name (`ErrorUnauthorized`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Human-readable message.
    pub message: String,
}
