//! Failure body styles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Shape of the JSON body emitted when a gate denies a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorStyle {
    /// `{"error":{"message":...}}`
    #[default]
    Minimal,
    /// `{"error":{"type":...,"name":...,"message":...}}`
    Structured,
}

impl ErrorStyle {
    /// Canonical lowercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Structured => "structured",
        }
    }
}

impl fmt::Display for ErrorStyle {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Returned when an error style label is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown error style '{label}'")]
pub struct UnknownErrorStyle {
    /// Label that failed to parse.
    pub label: String,
}

impl FromStr for ErrorStyle {
    type Err = UnknownErrorStyle;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(Self::Minimal),
            "structured" => Ok(Self::Structured),
            _ => Err(UnknownErrorStyle {
                label: value.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("minimal".parse::<ErrorStyle>(), Ok(ErrorStyle::Minimal));
        assert_eq!(" STRUCTURED ".parse::<ErrorStyle>(), Ok(ErrorStyle::Structured));
        assert_eq!(ErrorStyle::default(), ErrorStyle::Minimal);
        assert_eq!(ErrorStyle::Structured.to_string(), "structured");
    }

    #[test]
    fn unknown_label_is_named_in_the_error() {
        let err = "verbose".parse::<ErrorStyle>().expect_err("unknown label");
        assert_eq!(
            err,
            UnknownErrorStyle {
                label: "verbose".to_string()
            }
        );
        assert_eq!(err.to_string(), "unknown error style 'verbose'");
        let source: &dyn std::error::Error = &err;
        assert!(source.source().is_none());
    }

    #[test]
    fn styles_serialize_snake_case() -> Result<(), serde_json::Error> {
        assert_eq!(
            serde_json::to_string(&ErrorStyle::Structured)?,
            "\"structured\""
        );
        let parsed: ErrorStyle = serde_json::from_str("\"minimal\"")?;
        assert_eq!(parsed, ErrorStyle::Minimal);
        Ok(())
    }
}
