//! Gate wiring derived from [`AppConfig`].

use std::sync::Arc;

use tracing::warn;
use warden_auth::{BasicGate, CustomGate, ExpectedIdentity, FailureResponder, GateLayer};
use warden_config::{AppConfig, CustomRule, IdentityConfig};
use warden_telemetry::Metrics;

use crate::error::{AppError, AppResult};

/// Responder shared by every gated route.
///
/// # Errors
///
/// Returns [`AppError::InvalidConfig`] when the realm cannot be placed in a
/// header value.
pub fn responder(config: &AppConfig) -> AppResult<FailureResponder> {
    let responder = FailureResponder::new(config.error_style);
    match config.realm.as_deref() {
        Some(realm) => responder.with_realm(realm).map_err(|_| AppError::InvalidConfig {
            field: "realm",
            reason: "not a valid header value",
        }),
        None => Ok(responder),
    }
}

/// Static gate for the configured identity.
#[must_use]
pub fn basic_gate(config: &AppConfig) -> BasicGate {
    if config.identity.has_empty_field() {
        warn!("static gate configured with an empty field; /protected will deny every request");
    }
    BasicGate::new(expected_identity(&config.identity))
}

/// Identity the static gate compares against, copied from configuration.
#[must_use]
pub fn expected_identity(identity: &IdentityConfig) -> ExpectedIdentity {
    ExpectedIdentity::new(identity.username.clone(), identity.password.clone())
}

/// Custom gate admitting requests whose query carries `param=value`.
#[must_use]
pub fn query_rule_gate(rule: CustomRule) -> CustomGate {
    let rule = Arc::new(rule);
    CustomGate::from_async(move |head| {
        let rule = Arc::clone(&rule);
        async move { head.query_param(&rule.param).as_deref() == Some(rule.value.as_str()) }
    })
}

/// Wrap `gate` in a layer reporting through `responder` and `metrics`.
#[must_use]
pub fn layer<G: warden_auth::Gate>(
    gate: G,
    responder: &FailureResponder,
    metrics: &Metrics,
) -> GateLayer<G> {
    GateLayer::new(gate)
        .with_responder(responder.clone())
        .with_metrics(metrics.clone())
}
