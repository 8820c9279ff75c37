//! Boot sequence: configuration, telemetry, router, listener.

use tracing::info;
use warden_config::AppConfig;
use warden_telemetry::{LoggingConfig, Metrics};

use crate::error::{AppError, AppResult};
use crate::http::router::AppServer;

/// Dependencies required to boot the host.
pub(crate) struct BootstrapDependencies {
    config: AppConfig,
    metrics: Metrics,
}

impl BootstrapDependencies {
    /// Load configuration from the environment and build the metrics registry.
    pub(crate) fn from_env() -> AppResult<Self> {
        let config =
            AppConfig::from_env().map_err(|err| AppError::config("config.from_env", err))?;
        Self::from_config(config)
    }

    pub(crate) fn from_config(config: AppConfig) -> AppResult<Self> {
        let metrics =
            Metrics::new().map_err(|err| AppError::telemetry("telemetry.metrics", err))?;
        Ok(Self { config, metrics })
    }
}

/// Entry point for the boot sequence.
///
/// # Errors
///
/// Returns an error if configuration, telemetry or the listener fail.
pub async fn run_app() -> AppResult<()> {
    let dependencies = BootstrapDependencies::from_env()?;
    run_app_with(dependencies).await
}

pub(crate) async fn run_app_with(dependencies: BootstrapDependencies) -> AppResult<()> {
    let BootstrapDependencies { config, metrics } = dependencies;

    let logging = LoggingConfig {
        level: &config.logging.level,
        format: config.logging.format,
        build_sha: option_env!("WARDEN_BUILD_SHA").unwrap_or("dev"),
    };
    warden_telemetry::init_logging(&logging)
        .map_err(|err| AppError::telemetry("telemetry.init", err))?;

    info!(
        bind_addr = %config.bind_addr,
        error_style = %config.error_style,
        realm = config.realm.as_deref().unwrap_or(""),
        identity_complete = !config.identity.has_empty_field(),
        "warden bootstrap starting"
    );

    let server = AppServer::new(&config, metrics)?;
    server.serve(config.bind_addr).await
}
