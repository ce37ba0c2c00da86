//! Configuration loading from disk and startup overrides.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::RelayConfig;
use crate::config::validation::{split_host_port, validate_config, ValidationError};

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

/// Values that replace whatever the config file (or the defaults) say.
///
/// Filled from command line flags and environment variables.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub bind_address: Option<String>,
    pub port: Option<u16>,
    pub upstream_url: Option<String>,
    pub upstream_timeout_secs: Option<u64>,
    pub relay_status: bool,
}

impl Overrides {
    /// Apply the overrides on top of `config`.
    pub fn apply(self, config: &mut RelayConfig) {
        if let Some(bind_address) = self.bind_address {
            config.listener.bind_address = bind_address;
        }
        if let Some(port) = self.port {
            // An unparsable address is left alone for validation to report.
            if let Some((host, _)) = split_host_port(&config.listener.bind_address) {
                config.listener.bind_address = format!("{}:{}", host, port);
            }
        }
        if let Some(url) = self.upstream_url {
            config.upstream.url = url;
        }
        if let Some(secs) = self.upstream_timeout_secs {
            config.upstream.timeout_secs = Some(secs);
        }
        if self.relay_status {
            config.upstream.relay_status = true;
        }
    }
}

/// Parse configuration from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<RelayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Build the startup configuration: file (or defaults), then overrides, then validation.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: Overrides,
) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_config(&fs::read_to_string(path)?)?,
        None => RelayConfig::default(),
    };

    overrides.apply(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
