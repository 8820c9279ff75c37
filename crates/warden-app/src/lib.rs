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

//! Warden host binary wiring.
//!
//! Layout: `bootstrap.rs` (boot sequence), `http/` (routes and gate wiring),
//! `state.rs` (shared handler state), `error.rs` (error type).

/// Boot sequence and environment loading.
pub mod bootstrap;
/// Application error types.
pub mod error;
/// HTTP routes, gates and server host.
pub mod http;
/// Handler state.
pub mod state;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
pub use http::router::AppServer;
pub use state::AppState;
