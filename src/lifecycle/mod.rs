//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (http::server::SbiServer):
//!     Bind listener → register with NRF → build router → spawn serving task
//!
//! Serving task → outcome channel → lifecycle manager:
//!     Stopped   → done
//!     Failed    → error returned to the caller
//!     Panicked  → terminate, fatal error returned to the caller
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → bounded graceful shutdown
//!
//! Shutdown (requests.rs):
//!     refuse new requests → wait for in-flight ones (bounded) → close connections
//! ```
//!
//! # Design Decisions
//! - Registration failure is logged, not fatal
//! - Shutdown has a bound: connections still open after it are force-closed

pub mod requests;
pub mod signals;
pub mod state;

pub use requests::{RequestGuard, RequestTracker};
pub use signals::shutdown_signal;
pub use state::{panic_message, ServeOutcome, ServerState};
