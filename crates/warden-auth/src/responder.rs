//! 401 responses for denied requests.
//!
//! # Design
//! - One responder serves every gate; the style is fixed at setup.
//! - Every deny reason renders the same body, so clients cannot tell them apart.

use axum::Json;
use axum::http::header::{InvalidHeaderValue, WWW_AUTHENTICATE};
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};

use crate::constants::{BASIC_SCHEME, ERROR_NAME_UNAUTHORIZED, ERROR_TYPE_CLIENT};
use crate::error::AuthError;
use crate::models::{ErrorEnvelope, ErrorPayload};
use crate::style::ErrorStyle;

/// Builds the challenge header and JSON body sent when a gate denies.
#[derive(Debug, Clone)]
pub struct FailureResponder {
    style: ErrorStyle,
    challenge: HeaderValue,
}

impl FailureResponder {
    /// Responder emitting `style` bodies with a bare `Basic` challenge.
    #[must_use]
    pub fn new(style: ErrorStyle) -> Self {
        Self {
            style,
            challenge: HeaderValue::from_static(BASIC_SCHEME),
        }
    }

    /// Add `realm="..."` to the challenge.
    ///
    /// # Errors
    ///
    /// Returns an error when the realm contains bytes that cannot appear in a
    /// header value.
    pub fn with_realm(mut self, realm: &str) -> Result<Self, InvalidHeaderValue> {
        let quoted = realm.replace('\\', "\\\\").replace('"', "\\\"");
        self.challenge = HeaderValue::from_str(&format!("{BASIC_SCHEME} realm=\"{quoted}\""))?;
        Ok(self)
    }

    /// Configured body style.
    #[must_use]
    pub const fn style(&self) -> ErrorStyle {
        self.style
    }

    /// Value sent in `WWW-Authenticate`.
    #[must_use]
    pub const fn challenge(&self) -> &HeaderValue {
        &self.challenge
    }

    /// Body for `error` in the configured style.
    #[must_use]
    pub fn payload(&self, error: &AuthError) -> ErrorEnvelope {
        let (kind, name) = match self.style {
            ErrorStyle::Minimal => (None, None),
            ErrorStyle::Structured => (
                Some(ERROR_TYPE_CLIENT.to_string()),
                Some(ERROR_NAME_UNAUTHORIZED.to_string()),
            ),
        };
        ErrorEnvelope {
            error: ErrorPayload {
                kind,
                name,
                message: error.public_message().to_string(),
            },
        }
    }

    /// Complete 401 response for `error`.
    #[must_use]
    pub fn respond(&self, error: &AuthError) -> Response {
        (
            error.status(),
            [(WWW_AUTHENTICATE, self.challenge.clone())],
            Json(self.payload(error)),
        )
            .into_response()
    }
}

impl Default for FailureResponder {
    fn default() -> Self {
        Self::new(ErrorStyle::default())
    }
}
