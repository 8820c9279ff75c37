//! Environment-backed configuration loader.
//!
//! # Design
//! - Resolve every setting through one lookup function so tests can inject maps.
//! - Identity values are taken verbatim; everything else is trimmed and blank means unset.

use tracing::warn;
use warden_auth::ErrorStyle;
use warden_telemetry::{DEFAULT_LOG_LEVEL, LogFormat};

use crate::defaults::{
    DEFAULT_BIND_ADDR, DEFAULT_CUSTOM_PARAM, DEFAULT_CUSTOM_VALUE, DEFAULT_PASSWORD,
    DEFAULT_USERNAME, env,
};
use crate::error::{ConfigError, ConfigResult};
use crate::model::{AppConfig, CustomRule, IdentityConfig, LogSettings};
use crate::validate::{
    non_blank, parse_bind_addr, parse_error_style, parse_log_format, validate_realm,
};

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a variable is present but invalid, or when only one
    /// half of the basic identity is set.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`AppConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bind_addr = non_blank(lookup(env::BIND_ADDR))
            .map(|raw| parse_bind_addr(env::BIND_ADDR, &raw))
            .transpose()?
            .unwrap_or(DEFAULT_BIND_ADDR);

        let identity = load_identity(&lookup)?;

        let error_style = non_blank(lookup(env::ERROR_STYLE))
            .map(|raw| parse_error_style(env::ERROR_STYLE, &raw))
            .transpose()?
            .unwrap_or_default();

        let realm = non_blank(lookup(env::REALM))
            .map(|raw| validate_realm(env::REALM, &raw))
            .transpose()?;

        let custom = CustomRule {
            param: non_blank(lookup(env::CUSTOM_PARAM))
                .unwrap_or_else(|| DEFAULT_CUSTOM_PARAM.to_string()),
            value: non_blank(lookup(env::CUSTOM_VALUE))
                .unwrap_or_else(|| DEFAULT_CUSTOM_VALUE.to_string()),
        };

        let logging = LogSettings {
            level: non_blank(lookup(env::LOG_LEVEL))
                .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
            format: non_blank(lookup(env::LOG_FORMAT))
                .map(|raw| parse_log_format(env::LOG_FORMAT, &raw))
                .transpose()?
                .unwrap_or_else(LogFormat::infer),
        };

        Ok(Self {
            bind_addr,
            identity,
            error_style,
            realm,
            custom,
            logging,
        })
    }
}

fn load_identity<F>(lookup: &F) -> ConfigResult<IdentityConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let identity = match (lookup(env::BASIC_USERNAME), lookup(env::BASIC_PASSWORD)) {
        (None, None) => IdentityConfig {
            username: DEFAULT_USERNAME.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
        },
        (Some(username), Some(password)) => IdentityConfig { username, password },
        (Some(_), None) => {
            return Err(ConfigError::IncompleteIdentity {
                missing: env::BASIC_PASSWORD,
            });
        }
        (None, Some(_)) => {
            return Err(ConfigError::IncompleteIdentity {
                missing: env::BASIC_USERNAME,
            });
        }
    };

    if identity.has_empty_field() {
        warn!(
            username_empty = identity.username.is_empty(),
            password_empty = identity.password.is_empty(),
            "basic identity contains an empty field; every request will be denied"
        );
    }
    Ok(identity)
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR,
            identity: IdentityConfig {
                username: DEFAULT_USERNAME.to_string(),
                password: DEFAULT_PASSWORD.to_string(),
            },
            error_style: ErrorStyle::default(),
            realm: None,
            custom: CustomRule {
                param: DEFAULT_CUSTOM_PARAM.to_string(),
                value: DEFAULT_CUSTOM_VALUE.to_string(),
            },
            logging: LogSettings {
                level: DEFAULT_LOG_LEVEL.to_string(),
                format: LogFormat::infer(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() -> anyhow::Result<()> {
        let config = AppConfig::from_lookup(lookup_from(&[]))?;
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(AppConfig::default().bind_addr.to_string(), "127.0.0.1:7080");
        Ok(())
    }

    #[test]
    fn explicit_values_override_defaults() -> anyhow::Result<()> {
        let config = AppConfig::from_lookup(lookup_from(&[
            (env::BIND_ADDR, "0.0.0.0:9000"),
            (env::BASIC_USERNAME, "alice"),
            (env::BASIC_PASSWORD, " spaced secret "),
            (env::ERROR_STYLE, "structured"),
            (env::REALM, "staff"),
            (env::CUSTOM_PARAM, "key"),
            (env::CUSTOM_VALUE, "open"),
            (env::LOG_LEVEL, "debug"),
            (env::LOG_FORMAT, "json"),
        ]))?;

        assert_eq!(config.bind_addr.port(), 9000);
        assert_eq!(config.identity.username, "alice");
        assert_eq!(config.identity.password, " spaced secret ");
        assert_eq!(config.error_style, ErrorStyle::Structured);
        assert_eq!(config.realm.as_deref(), Some("staff"));
        assert_eq!(config.custom.param, "key");
        assert_eq!(config.custom.value, "open");
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        Ok(())
    }

    #[test]
    fn half_identity_is_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[(env::BASIC_USERNAME, "bob")]))
            .expect_err("password missing");
        assert!(matches!(
            err,
            ConfigError::IncompleteIdentity {
                missing: env::BASIC_PASSWORD
            }
        ));

        let err = AppConfig::from_lookup(lookup_from(&[(env::BASIC_PASSWORD, "pw")]))
            .expect_err("username missing");
        assert!(matches!(
            err,
            ConfigError::IncompleteIdentity {
                missing: env::BASIC_USERNAME
            }
        ));
    }

    #[test]
    fn empty_identity_fields_are_kept_verbatim() -> anyhow::Result<()> {
        let config = AppConfig::from_lookup(lookup_from(&[
            (env::BASIC_USERNAME, ""),
            (env::BASIC_PASSWORD, "secret"),
        ]))?;
        assert_eq!(config.identity.username, "");
        assert!(config.identity.has_empty_field());
        Ok(())
    }

    #[test]
    fn invalid_values_name_the_field() {
        let err = AppConfig::from_lookup(lookup_from(&[(env::ERROR_STYLE, "chatty")]))
            .expect_err("invalid style");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: env::ERROR_STYLE,
                ..
            }
        ));

        let err = AppConfig::from_lookup(lookup_from(&[(env::BIND_ADDR, "nowhere")]))
            .expect_err("invalid address");
        assert!(matches!(
            err,
            ConfigError::InvalidField {
                field: env::BIND_ADDR,
                ..
            }
        ));
    }
}
