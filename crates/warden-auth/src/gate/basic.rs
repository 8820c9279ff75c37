//! Static credential gate: one configured username/password pair.
//!
//! # Design
//! - Both fields are compared by exact, constant-time equality; both comparisons always run.
//! - Mismatch reasons are kept internal; the response never says which field was wrong.
//! - An empty expected field can never match because parsed credentials are never empty.

use std::fmt;
use std::future;
use std::sync::Arc;

use axum::http::Request;
use subtle::ConstantTimeEq;

use crate::constants::GATE_BASIC;
use crate::credentials::{self, ParsedCredentials};
use crate::error::AuthError;
use crate::gate::{Decision, Gate, GateFuture};

/// Username/password pair a request must present.
#[derive(Clone, PartialEq, Eq)]
pub struct ExpectedIdentity {
    username: String,
    password: String,
}

impl ExpectedIdentity {
    /// Configure the expected pair. Empty values are kept verbatim.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Expected username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    fn matches(&self, username: &str, password: &str) -> bool {
        let username_ok = ct_eq(username.as_bytes(), self.username.as_bytes());
        let password_ok = ct_eq(password.as_bytes(), self.password.as_bytes());
        username_ok & password_ok
    }
}

impl fmt::Debug for ExpectedIdentity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ExpectedIdentity")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Gate that admits requests carrying exactly the expected Basic credentials.
#[derive(Debug, Clone)]
pub struct BasicGate {
    expected: Arc<ExpectedIdentity>,
}

impl BasicGate {
    /// Build a gate for `expected`.
    #[must_use]
    pub fn new(expected: ExpectedIdentity) -> Self {
        Self {
            expected: Arc::new(expected),
        }
    }

    /// Identity this gate compares against.
    #[must_use]
    pub fn expected(&self) -> &ExpectedIdentity {
        &self.expected
    }

    /// Decide on already-parsed credentials.
    #[must_use]
    pub fn check(&self, parsed: &ParsedCredentials) -> Decision {
        match parsed {
            ParsedCredentials::Absent => Decision::Deny(AuthError::NoCredentials),
            ParsedCredentials::Present(credentials) => {
                if self
                    .expected
                    .matches(credentials.username(), credentials.password())
                {
                    Decision::Allow
                } else {
                    Decision::Deny(AuthError::InvalidCredentials)
                }
            }
        }
    }
}

impl Gate for BasicGate {
    fn name(&self) -> &'static str {
        GATE_BASIC
    }

    fn evaluate<B>(&self, request: &Request<B>) -> GateFuture {
        let decision = self.check(&credentials::from_headers(request.headers()));
        Box::pin(future::ready(decision))
    }
}

/// Static gate for `username`/`password`.
#[must_use]
pub fn basic(username: impl Into<String>, password: impl Into<String>) -> BasicGate {
    BasicGate::new(ExpectedIdentity::new(username, password))
}

fn ct_eq(supplied: &[u8], expected: &[u8]) -> bool {
    supplied.len() == expected.len() && bool::from(supplied.ct_eq(expected))
}
