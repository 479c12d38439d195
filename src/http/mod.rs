//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP/TLS connection (axum-server, HTTP/2 or HTTP/1.1)
//!     → server.rs (lifecycle, panic capture)
//!     → router.rs (request id, tracing, route groups per service family)
//!     → middleware/authorization.rs (per-group gate)
//!     → processor (resource handlers)
//!     → JSON body or ProblemDetails
//! ```

pub mod middleware;
pub mod router;
pub mod server;

pub use router::{build_router, route_groups, Route, RouteGroup};
pub use server::{SbiServer, DEFAULT_SHUTDOWN_TIMEOUT};
