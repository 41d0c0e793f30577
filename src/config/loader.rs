//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{DispatcherConfig, RuntimeMode};
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the configured app base host.
pub const ENV_APP_BASE_HOST: &str = "APP_BASE_HOST";
/// Overrides the configured runtime mode.
pub const ENV_RUNTIME_MODE: &str = "RUNTIME_MODE";
/// Overrides the configured webhook base host.
pub const ENV_WEBHOOK_BASE_HOST: &str = "WEBHOOK_BASE_HOST";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then apply
/// environment overrides.
pub fn load_config(path: &Path) -> Result<DispatcherConfig, ConfigError> {
    load_config_with(path, |key| std::env::var(key).ok())
}

/// Like [`load_config`], reading overrides through `lookup`.
pub fn load_config_with<F>(path: &Path, lookup: F) -> Result<DispatcherConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let content = fs::read_to_string(path)?;
    let config: DispatcherConfig = toml::from_str(&content)?;
    finish(config, lookup)
}

/// Build the configuration without a file: defaults plus environment overrides.
pub fn load_from_env() -> Result<DispatcherConfig, ConfigError> {
    finish(DispatcherConfig::default(), |key| std::env::var(key).ok())
}

fn finish<F>(mut config: DispatcherConfig, lookup: F) -> Result<DispatcherConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env_overrides(&mut config, lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Apply environment overrides using the given lookup.
///
/// Empty values are ignored for the hosts, so `APP_BASE_HOST=` leaves the
/// file value in place.
pub fn apply_env_overrides<F>(config: &mut DispatcherConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(ENV_APP_BASE_HOST).filter(|v| !v.is_empty()) {
        config.environment.app_base_host = host;
    }
    if let Some(mode) = lookup(ENV_RUNTIME_MODE) {
        config.environment.runtime_mode = RuntimeMode::from(mode);
    }
    if let Some(host) = lookup(ENV_WEBHOOK_BASE_HOST).filter(|v| !v.is_empty()) {
        config.environment.webhook_base_host = Some(host);
    }
}
