//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Request under an authorized prefix
//!     → http/middleware/authorization.rs (axum layer)
//!     → authorization.rs (RouterAuthorizationCheck for the group's service)
//!     → token.rs (bearer extraction, JWT claims)
//!     → SelfContextProvider::authorize
//!     → allow (next handler) | deny (401/403 ProblemDetails)
//! ```

pub mod authorization;
pub mod token;

pub use authorization::RouterAuthorizationCheck;
pub use token::{AccessTokenClaims, AuthorizationError};
