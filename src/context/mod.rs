//! UDM self context.
//!
//! Holds the NF instance id (assigned by the NRF after registration) and the
//! authorization policy applied by the per-service gates. The context is
//! passed explicitly to the router and the gates.

use std::fmt;
use std::sync::{PoisonError, RwLock};

use crate::config::UdmConfig;
use crate::security::token::{decode_claims, AuthorizationError};

/// Logical SBI services exposed by the UDM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceName {
    NudmEe,
    NudmUeau,
    NudmUecm,
    NudmSdm,
    NudmPp,
}

impl ServiceName {
    pub const ALL: [ServiceName; 5] = [
        Self::NudmEe,
        Self::NudmUeau,
        Self::NudmUecm,
        Self::NudmSdm,
        Self::NudmPp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NudmEe => "nudm-ee",
            Self::NudmUeau => "nudm-ueau",
            Self::NudmUecm => "nudm-uecm",
            Self::NudmSdm => "nudm-sdm",
            Self::NudmPp => "nudm-pp",
        }
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Self-context capabilities used by the server and the authorization gates.
pub trait SelfContextProvider: Send + Sync {
    fn nf_instance_id(&self) -> String;

    fn set_nf_instance_id(&self, id: String);

    /// Decide whether the bearer `token` grants access to `service`.
    fn authorize(&self, token: Option<&str>, service: ServiceName) -> Result<(), AuthorizationError>;
}

#[derive(Debug)]
pub struct UdmContext {
    nf_instance_id: RwLock<String>,
    oauth2_required: bool,
}

impl UdmContext {
    pub fn new(nf_instance_id: impl Into<String>, oauth2_required: bool) -> Self {
        Self {
            nf_instance_id: RwLock::new(nf_instance_id.into()),
            oauth2_required,
        }
    }

    /// Build from configuration, generating an instance id if none is set.
    pub fn from_config(config: &UdmConfig) -> Self {
        let nf_id = config
            .nf_instance_id
            .clone()
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        Self::new(nf_id, config.security.oauth2_required)
    }
}

impl SelfContextProvider for UdmContext {
    fn nf_instance_id(&self) -> String {
        self.nf_instance_id
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_nf_instance_id(&self, id: String) {
        *self
            .nf_instance_id
            .write()
            .unwrap_or_else(PoisonError::into_inner) = id;
    }

    fn authorize(&self, token: Option<&str>, service: ServiceName) -> Result<(), AuthorizationError> {
        if !self.oauth2_required {
            return Ok(());
        }

        let claims = decode_claims(token.ok_or(AuthorizationError::MissingToken)?)?;
        if claims.is_expired() {
            return Err(AuthorizationError::Expired);
        }
        if !claims.covers(service) {
            return Err(AuthorizationError::InsufficientScope(service));
        }
        Ok(())
    }
}
