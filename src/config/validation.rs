//! Configuration validation.
//!
//! Returns all validation errors, not just the first. The SBI scheme is
//! deliberately not checked here: it is resolved when serving starts.

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::UdmConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("sbi.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("service_prefixes.{key} {value:?} must be empty or start with '/' and not end with '/'")]
    PrefixShape { key: &'static str, value: String },

    /// Two families share a prefix (including the empty one).
    #[error("service_prefixes.{key} {value:?} is used by more than one service")]
    DuplicatePrefix { key: &'static str, value: String },

    #[error("nrf.uri {0:?} is not a valid URL")]
    NrfUri(String),

    #[error("sbi.tls.{0} must be set when scheme is https")]
    MissingTls(&'static str),

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Semantic checks on a parsed configuration.
pub fn validate_config(config: &UdmConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.sbi.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.sbi.bind_address.clone()));
    }

    let mut seen = HashSet::new();
    for (key, value) in config.service_prefixes.entries() {
        if !value.is_empty() && (!value.starts_with('/') || value.ends_with('/')) {
            errors.push(ValidationError::PrefixShape {
                key,
                value: value.to_string(),
            });
        } else if !seen.insert(value) {
            errors.push(ValidationError::DuplicatePrefix {
                key,
                value: value.to_string(),
            });
        }
    }

    if url::Url::parse(&config.nrf.uri).is_err() {
        errors.push(ValidationError::NrfUri(config.nrf.uri.clone()));
    }

    if config.sbi.scheme == "https" {
        if config.sbi.tls.pem.is_empty() {
            errors.push(ValidationError::MissingTls("pem"));
        }
        if config.sbi.tls.key.is_empty() {
            errors.push(ValidationError::MissingTls("key"));
        }
    }

    if config.timeouts.shutdown_ms == 0 {
        errors.push(ValidationError::Zero("timeouts.shutdown_ms"));
    }
    if config.security.max_body_size == 0 {
        errors.push(ValidationError::Zero("security.max_body_size"));
    }
    if config.nrf.request_timeout_secs == 0 {
        errors.push(ValidationError::Zero("nrf.request_timeout_secs"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
