//! Crate-level error type for startup failures.

use thiserror::Error;

use crate::config::ConfigError;
use crate::forward::ForwardError;

/// Anything that stops the relay from starting or serving.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("upstream setup failed: {0}")]
    Forward(#[from] ForwardError),

    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: std::io::Error,
    },

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
