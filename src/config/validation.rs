//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the upstream URL (absolute, http or https)
//! - Validate value ranges (timeouts > 0, body limit > 0, bind address is host:port)
//! - Keep the route path literal (no captures or wildcards)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address `{0}` is not a host:port address")]
    BindAddress(String),

    #[error("upstream.url `{url}` is invalid: {reason}")]
    UpstreamUrl { url: String, reason: String },

    #[error("upstream.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("route.path `{0}` must be a literal path starting with '/'")]
    RoutePath(String),

    #[error("security.max_body_size must be greater than zero")]
    ZeroBodyLimit,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if split_host_port(&config.listener.bind_address).is_none() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Err(reason) = check_upstream_url(&config.upstream.url) {
        errors.push(ValidationError::UpstreamUrl {
            url: config.upstream.url.clone(),
            reason,
        });
    }

    if config.upstream.timeout_secs == Some(0) {
        errors.push(ValidationError::ZeroTimeout);
    }

    let path = &config.route.path;
    // Captures and wildcards would make the router panic at startup.
    if !path.starts_with('/') || path.contains(['{', '}', '*', ':']) {
        errors.push(ValidationError::RoutePath(config.route.path.clone()));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::ZeroBodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Split a bind address into host and port.
///
/// Accepts socket addresses (`0.0.0.0:3000`, `[::1]:3000`) and hostnames
/// (`localhost:3000`). Names are resolved only when the listener binds.
pub(crate) fn split_host_port(address: &str) -> Option<(&str, u16)> {
    if let Ok(addr) = address.parse::<SocketAddr>() {
        let (host, _) = address.rsplit_once(':')?;
        return Some((host, addr.port()));
    }
    let (host, port) = address.rsplit_once(':')?;
    let is_hostname = !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.');
    if !is_hostname {
        return None;
    }
    Some((host, port.parse().ok()?))
}

fn check_upstream_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme `{}`", other)),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
