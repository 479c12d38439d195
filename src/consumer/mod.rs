//! Collaborators the SBI layer delegates to.
//!
//! # Data Flow
//! ```text
//! processor (HTTP handlers)
//!     → EeSubscriptionService (business logic, owns subscription state)
//!
//! http::server (lifecycle)
//!     → Registerer (NFRegister against the NRF)
//! ```
//!
//! The traits are the seams; `ee_store.rs` and `nrf.rs` are the default
//! implementations wired by the binary.

pub mod ee_store;
pub mod nrf;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{EeSubscription, PatchItem, ProblemDetails};

pub use ee_store::InMemoryEeStore;
pub use nrf::NrfClient;

/// Business logic behind the Nudm_EE subscription resource.
///
/// Implementations serialize operations on the same subscription id
/// themselves; the SBI layer calls them concurrently.
#[async_trait]
pub trait EeSubscriptionService: Send + Sync {
    /// `Ok(Some(_))` is the created subscription, `Err(_)` a rejection.
    /// `Ok(None)` means neither could be produced.
    async fn create_ee_subscription(
        &self,
        ue_identity: &str,
        subscription: EeSubscription,
    ) -> std::result::Result<Option<EeSubscription>, ProblemDetails>;

    async fn delete_ee_subscription(&self, ue_identity: &str, subscription_id: &str);

    async fn update_ee_subscription(
        &self,
        ue_identity: &str,
        subscription_id: &str,
        patch: Vec<PatchItem>,
    ) -> std::result::Result<(), ProblemDetails>;
}

/// Outcome of a successful NF registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NfRegistration {
    /// Resource URI returned by the NRF, if any.
    pub location: Option<String>,
    /// NF instance id the NRF registered us under.
    pub nf_instance_id: String,
}

/// Registers this NF instance with the directory service.
#[async_trait]
pub trait Registerer: Send + Sync {
    async fn register_nf_instance(&self) -> Result<NfRegistration>;
}
