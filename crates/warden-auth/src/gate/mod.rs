//! Gates: units that turn a request into an allow/deny [`Decision`].

pub mod basic;
pub mod custom;

use std::future::Future;
use std::pin::Pin;

use axum::http::{HeaderMap, Method, Request, Uri};

use crate::credentials::{self, ParsedCredentials};
use crate::error::AuthError;

/// Outcome of one gate evaluation.
#[derive(Debug)]
pub enum Decision {
    /// Continue to the next pipeline stage.
    Allow,
    /// Short-circuit with a 401.
    Deny(AuthError),
}

impl Decision {
    /// True for [`Decision::Allow`].
    #[must_use]
    pub const fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Future resolving to a gate's decision.
pub type GateFuture = Pin<Box<dyn Future<Output = Decision> + Send + 'static>>;

/// A request-gating policy.
///
/// `evaluate` inspects the request synchronously and returns an owned future,
/// so the request itself is never held across the decision.
pub trait Gate: Send + Sync + 'static {
    /// Label used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Decide whether `request` may proceed.
    fn evaluate<B>(&self, request: &Request<B>) -> GateFuture;
}

/// Owned view of a request handed to decision functions.
#[derive(Debug, Clone)]
pub struct RequestHead {
    /// Request method.
    pub method: Method,
    /// Request URI, including the query string.
    pub uri: Uri,
    /// Request headers.
    pub headers: HeaderMap,
}

impl RequestHead {
    /// Snapshot the method, URI and headers of `request`.
    #[must_use]
    pub fn from_request<B>(request: &Request<B>) -> Self {
        Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            headers: request.headers().clone(),
        }
    }

    /// First value of a percent-decoded query parameter.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<String> {
        let query = self.uri.query()?;
        url::form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    /// Basic credentials carried by the request, if any.
    #[must_use]
    pub fn credentials(&self) -> ParsedCredentials {
        credentials::from_headers(&self.headers)
    }
}
