//! Upstream forwarding subsystem.
//!
//! # Data Flow
//! ```text
//! validated JSON body (Bytes)
//!     → client.rs (one POST to the upstream URL, redirects followed)
//!     → UpstreamReply { status, body }  or  ForwardError
//!     → http::response (relay or error body)
//! ```
//!
//! # Design Decisions
//! - One reqwest::Client per process, shared by all requests
//! - No retries; a failed call is reported once
//! - Timeout only when configured

pub mod client;
pub mod error;

pub use client::{Forwarder, UpstreamReply};
pub use error::ForwardError;
