//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Request handling produces:
//!     → tracing spans (one per request, carrying the request ID)
//!     → tracing events (upstream outcome, latency, errors)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//! ```

pub mod logging;

pub use logging::init_logging;
