//! Crate-wide error type.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors raised by the SBI server and its collaborators.
#[derive(Error, Debug)]
pub enum SbiError {
    /// The SBI listener could not be bound.
    #[error("failed to bind SBI listener on {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// The configured bind address is not a socket address.
    #[error("invalid bind address {0:?}")]
    InvalidBindAddress(String),

    /// The configured scheme is neither `http` nor `https`.
    #[error("unsupported SBI scheme [{0}]")]
    UnsupportedScheme(String),

    /// Certificate or key could not be loaded.
    #[error("TLS error: {0}")]
    Tls(#[source] std::io::Error),

    /// The accept/serve loop terminated with an I/O error.
    #[error("SBI server error on {addr}: {source}")]
    Serve {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// NF registration with the NRF failed.
    #[error("NRF registration failed: {0}")]
    Registration(String),

    /// Transport error talking to the NRF.
    #[error("NRF request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// `run` was called on a server whose listener is already consumed.
    #[error("SBI server already started")]
    AlreadyStarted,

    /// The serving task (or a request handler) panicked.
    #[error("SBI server panicked: {0}")]
    Panicked(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result type for SBI operations.
pub type Result<T> = std::result::Result<T, SbiError>;
