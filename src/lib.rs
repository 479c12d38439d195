//! UDM SBI server library.
//!
//! Serves the Nudm service families over HTTP/2, gates each family with an
//! OAuth2 scope check, and implements the event-exposure subscription
//! resources on top of a pluggable [`consumer::EeSubscriptionService`].

pub mod config;
pub mod consumer;
pub mod context;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod net;
pub mod observability;
pub mod processor;
pub mod security;

pub use config::UdmConfig;
pub use context::{SelfContextProvider, ServiceName, UdmContext};
pub use error::{Result, SbiError};
pub use http::SbiServer;
pub use lifecycle::ServerState;
