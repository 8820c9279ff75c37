//! Fallback values applied when the environment leaves a setting unset.
//!
//! # Design
//! - Centralize defaults so the loader and tests agree on them.
//! - Defaults describe the demo routes served by `warden-app`.

use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

/// Address the host binary listens on.
pub const DEFAULT_BIND_ADDR: SocketAddr =
    SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 7080));
/// Username expected by the protected demo route.
pub const DEFAULT_USERNAME: &str = "bob";
/// Password expected by the protected demo route.
pub const DEFAULT_PASSWORD: &str = "bobisthebest";
/// Query parameter inspected by the custom demo route.
pub const DEFAULT_CUSTOM_PARAM: &str = "letmein";
/// Query value that unlocks the custom demo route.
pub const DEFAULT_CUSTOM_VALUE: &str = "now";

/// Environment variable names consulted by the loader.
pub mod env {
    /// Socket address for the HTTP listener.
    pub const BIND_ADDR: &str = "WARDEN_BIND_ADDR";
    /// Expected username for the static gate.
    pub const BASIC_USERNAME: &str = "WARDEN_BASIC_USERNAME";
    /// Expected password for the static gate.
    pub const BASIC_PASSWORD: &str = "WARDEN_BASIC_PASSWORD";
    /// `minimal` or `structured` failure payloads.
    pub const ERROR_STYLE: &str = "WARDEN_ERROR_STYLE";
    /// Optional realm advertised in the challenge header.
    pub const REALM: &str = "WARDEN_REALM";
    /// Fallback log filter when `RUST_LOG` is unset.
    pub const LOG_LEVEL: &str = "WARDEN_LOG_LEVEL";
    /// `json` or `pretty` log output.
    pub const LOG_FORMAT: &str = "WARDEN_LOG_FORMAT";
    /// Query parameter inspected by the custom gate.
    pub const CUSTOM_PARAM: &str = "WARDEN_CUSTOM_PARAM";
    /// Query value accepted by the custom gate.
    pub const CUSTOM_VALUE: &str = "WARDEN_CUSTOM_VALUE";
}
