//! Forwarder error type.

use std::error::Error as _;

use thiserror::Error;

/// Failure of the outbound round trip to the upstream.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("invalid upstream URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build upstream client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("upstream request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("failed to read upstream response: {0}")]
    Body(#[source] reqwest::Error),
}

impl ForwardError {
    /// Whether the upstream did not answer within the configured timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            ForwardError::Request(e) | ForwardError::Body(e) => e.is_timeout(),
            _ => false,
        }
    }

    /// The message plus every distinct cause below it, joined with `": "`.
    ///
    /// reqwest keeps the interesting part ("Connection refused", DNS failure)
    /// in the source chain rather than its own Display.
    pub fn detail(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(cause) = source {
            let text = cause.to_string();
            if !message.contains(&text) {
                message.push_str(": ");
                message.push_str(&text);
            }
            source = cause.source();
        }
        message
    }
}
