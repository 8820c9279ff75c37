//! `Authorization: Basic` credential parsing.
//!
//! # Design
//! - Parsing is total: malformed or missing input yields [`ParsedCredentials::Absent`].
//! - A [`Credentials`] value always carries a non-empty username and password.
//! - The password never appears in `Debug` output.

use std::fmt;

use axum::http::{HeaderMap, header::AUTHORIZATION};
use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, general_purpose};

use crate::constants::BASIC_SCHEME;

/// Standard alphabet; clients differ on whether they pad, so padding is optional.
const BASIC_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    general_purpose::PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Username/password pair supplied by a client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    /// Build a pair, or `None` when either half is empty.
    #[must_use]
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Option<Self> {
        let username = username.into();
        let password = password.into();
        if username.is_empty() || password.is_empty() {
            return None;
        }
        Some(Self { username, password })
    }

    /// Supplied username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Supplied password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of parsing a raw authorization value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCredentials {
    /// Both fields were present and non-empty.
    Present(Credentials),
    /// Missing, malformed, or partially populated input.
    Absent,
}

impl ParsedCredentials {
    /// Borrow the credentials when present.
    #[must_use]
    pub const fn as_credentials(&self) -> Option<&Credentials> {
        match self {
            Self::Present(credentials) => Some(credentials),
            Self::Absent => None,
        }
    }

    /// True for [`ParsedCredentials::Absent`].
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

/// Parse a raw `Authorization` value such as `Basic Ym9iOnNlY3JldA==`.
#[must_use]
pub fn parse_basic(raw: Option<&str>) -> ParsedCredentials {
    raw.and_then(decode_basic)
        .map_or(ParsedCredentials::Absent, ParsedCredentials::Present)
}

/// Parse the first `Authorization` header of a request.
#[must_use]
pub fn from_headers(headers: &HeaderMap) -> ParsedCredentials {
    parse_basic(
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok()),
    )
}

fn decode_basic(raw: &str) -> Option<Credentials> {
    let (scheme, token) = raw.trim().split_once(|ch: char| ch.is_ascii_whitespace())?;
    if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
        return None;
    }
    let decoded = BASIC_ENGINE.decode(token.trim()).ok()?;
    let text = String::from_utf8(decoded).ok()?;
    // Usernames cannot contain ':'; passwords may.
    let (username, password) = text.split_once(':')?;
    Credentials::new(username, password)
}
