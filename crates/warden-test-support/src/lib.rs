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

//! Shared test helpers used across integration suites.
//! Layout: fixtures.rs (request builders), http.rs (one-shot router driving).

pub mod fixtures;
pub mod http;

pub use fixtures::{basic_header, get, get_with_basic};
pub use http::{TestResponse, send};
