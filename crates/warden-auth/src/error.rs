//! # Design
//!
//! - Every deny reason is a distinct variant for logs and metrics.
//! - Externally all variants collapse to one 401 with a constant message.
//! - Decision-function failures keep their source for diagnostics.

use std::any::Any;
use std::error::Error;

use axum::http::StatusCode;
use thiserror::Error;

use crate::constants::AUTH_FAILED_MESSAGE;

/// Boxed error returned by fallible decision functions.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// Reason a gate denied a request.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The request carried no parsable credentials.
    #[error("no credentials supplied")]
    NoCredentials,
    /// Credentials were supplied but did not match the expected identity.
    #[error("credentials rejected")]
    InvalidCredentials,
    /// The decision function answered `false`.
    #[error("authorization denied")]
    Denied,
    /// The decision function failed before answering.
    #[error("authorization decision failed")]
    DecisionFailed {
        /// Underlying decision failure.
        #[source]
        source: DecisionError,
    },
}

impl AuthError {
    /// Status code for every deny reason.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    /// Message shown to clients; identical for every variant.
    #[must_use]
    pub const fn public_message(&self) -> &'static str {
        AUTH_FAILED_MESSAGE
    }

    /// Stable label used in logs and metrics.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::NoCredentials => "no_credentials",
            Self::InvalidCredentials => "invalid_credentials",
            Self::Denied => "denied",
            Self::DecisionFailed { .. } => "decision_failed",
        }
    }
}

impl From<DecisionError> for AuthError {
    fn from(source: DecisionError) -> Self {
        Self::DecisionFailed { source }
    }
}

/// Failure of a custom decision function.
#[derive(Debug, Error)]
pub enum DecisionError {
    /// The decision function returned an error.
    #[error("decision function returned an error")]
    Failed {
        /// Error produced by the decision function.
        #[source]
        source: BoxError,
    },
    /// The decision function panicked.
    #[error("decision function panicked")]
    Panicked {
        /// Panic payload rendered as text when possible.
        message: String,
    },
    /// Every completion handle was dropped without answering.
    #[error("decision function dropped its completion handle")]
    Abandoned,
}

impl DecisionError {
    /// Wrap an error returned by a decision function.
    pub fn failed(source: impl Into<BoxError>) -> Self {
        Self::Failed {
            source: source.into(),
        }
    }

    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&'static str>()
            .map(|text| (*text).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        Self::Panicked { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn every_variant_maps_to_the_same_public_outcome() {
        let errors = [
            AuthError::NoCredentials,
            AuthError::InvalidCredentials,
            AuthError::Denied,
            AuthError::from(DecisionError::Abandoned),
        ];
        for error in &errors {
            assert_eq!(error.status(), StatusCode::UNAUTHORIZED);
            assert_eq!(error.public_message(), "Authentication Failed");
        }
        let reasons: Vec<_> = errors.iter().map(AuthError::reason).collect();
        assert_eq!(
            reasons,
            [
                "no_credentials",
                "invalid_credentials",
                "denied",
                "decision_failed"
            ]
        );
    }

    #[test]
    fn decision_failure_preserves_source_chain() {
        let error = AuthError::from(DecisionError::failed(io::Error::other("backend down")));
        assert_eq!(error.to_string(), "authorization decision failed");
        let decision = error.source().expect("decision source");
        assert_eq!(decision.to_string(), "decision function returned an error");
        let root = decision.source().expect("root source");
        assert_eq!(root.to_string(), "backend down");
    }

    #[test]
    fn panic_payloads_are_rendered() {
        let from_str = DecisionError::from_panic(Box::new("boom"));
        assert!(matches!(from_str, DecisionError::Panicked { ref message } if message == "boom"));

        let from_string = DecisionError::from_panic(Box::new(String::from("kaboom")));
        assert!(
            matches!(from_string, DecisionError::Panicked { ref message } if message == "kaboom")
        );

        let opaque = DecisionError::from_panic(Box::new(42_u8));
        assert!(matches!(
            opaque,
            DecisionError::Panicked { ref message } if message == "non-string panic payload"
        ));
    }
}
