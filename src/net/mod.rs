//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Configured bind address
//!     → listener.rs (bind at construction, non-blocking)
//!     → scheme.rs (http | https)
//!     → tls.rs (certificate + key, https only)
//!     → axum-server accept loop (http::server)
//! ```

pub mod listener;
pub mod scheme;
pub mod tls;

pub use listener::bind_listener;
pub use scheme::UriScheme;
