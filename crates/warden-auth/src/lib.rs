#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Request gating for axum/tower services.
//!
//! A [`Gate`] turns a request into a [`Decision`]. [`GateLayer`] runs a gate in
//! front of a route: allowed requests continue untouched, denied ones receive a
//! 401 with a `WWW-Authenticate: Basic` challenge built by [`FailureResponder`].
//!
//! Two gates ship with the crate:
//! - [`BasicGate`] compares `Authorization: Basic` credentials against one
//!   configured identity (see [`basic`]).
//! - [`CustomGate`] delegates the decision to an async function or to a
//!   callback answering through a single-shot [`Completion`].
//!
//! ```no_run
//! use axum::{Router, routing::get};
//! use warden_auth::{CustomGate, GateLayer, basic};
//!
//! let app: Router = Router::new()
//!     .route("/protected", get(|| async { "ok" }))
//!     .route_layer(GateLayer::new(basic("bob", "bobisthebest")))
//!     .route(
//!         "/custom",
//!         get(|| async { "ok" }).route_layer(GateLayer::new(CustomGate::from_async(
//!             |head| async move { head.query_param("letmein").as_deref() == Some("now") },
//!         ))),
//!     );
//! ```

pub mod constants;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod layer;
pub mod models;
pub mod responder;
pub mod style;

pub use credentials::{Credentials, ParsedCredentials, from_headers, parse_basic};
pub use error::{AuthError, BoxError, DecisionError};
pub use gate::basic::{BasicGate, ExpectedIdentity, basic};
pub use gate::custom::{Completion, CustomGate};
pub use gate::{Decision, Gate, GateFuture, RequestHead};
pub use layer::{AdmitFuture, GateGuard, GateLayer, GateOutcome, GateService, require_gate};
pub use models::{ErrorEnvelope, ErrorPayload};
pub use responder::FailureResponder;
pub use style::{ErrorStyle, UnknownErrorStyle};
