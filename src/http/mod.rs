//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, route dispatch)
//!     → request.rs (request ID, JSON body check)
//!     → forward (one upstream POST)
//!     → response.rs (relay body or JSON error, CORS headers)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use response::{ErrorBody, RelayError};
pub use server::RelayServer;
