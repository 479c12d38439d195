//! SBI listener binding.
//!
//! The socket is bound when the server is constructed so that a bind failure
//! surfaces as a construction error, and `local_addr` is known before
//! serving starts.

use std::net::{SocketAddr, TcpListener};

use crate::error::{Result, SbiError};

/// Bind a non-blocking TCP listener on `bind_address`.
pub fn bind_listener(bind_address: &str) -> Result<TcpListener> {
    let addr: SocketAddr = bind_address
        .parse()
        .map_err(|_| SbiError::InvalidBindAddress(bind_address.to_string()))?;

    let bind_err = |source| SbiError::Bind {
        addr: bind_address.to_string(),
        source,
    };

    let listener = TcpListener::bind(addr).map_err(bind_err)?;
    listener.set_nonblocking(true).map_err(bind_err)?;

    tracing::info!(address = %addr, "Listener bound");
    Ok(listener)
}
