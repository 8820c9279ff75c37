//! HTTP surface of the host binary.
//!
//! Layout: `router.rs` (route table and server), `gates.rs` (gate wiring from
//! configuration), `handlers.rs` (route bodies), `telemetry.rs` (request counter).

pub mod gates;
pub mod handlers;
pub mod router;
pub(crate) mod telemetry;
