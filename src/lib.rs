//! Sheet relay: a single-route HTTP relay with permissive CORS.
//!
//! ```text
//!  browser ──POST /sheet-proxy──▶ http::server ──▶ forward ──POST──▶ upstream
//!          ◀──200 + upstream body── http::response ◀── UpstreamReply ◀──┘
//! ```
//!
//! OPTIONS on the same route is answered locally with the CORS headers.

pub mod config;
pub mod error;
pub mod forward;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::schema::RelayConfig;
pub use error::{Error, Result};
pub use http::RelayServer;
pub use lifecycle::Shutdown;
