//! Observability subsystem.
//!
//! # Design Decisions
//! - `tracing` macros with structured fields everywhere
//! - HTTP request spans come from `tower_http::trace::TraceLayer` (router)
//! - Panics are logged with a backtrace by the hook in logging.rs

pub mod logging;

pub use logging::{init_logging, install_panic_hook};
