//! In-memory event-exposure subscription store.

use std::collections::HashMap;

use async_trait::async_trait;
use axum::http::StatusCode;
use dashmap::DashMap;
use uuid::Uuid;

use crate::consumer::EeSubscriptionService;
use crate::models::{apply_patch, cause, EeSubscription, PatchItem, ProblemDetails};

/// Subscriptions keyed by UE identity, then subscription id.
///
/// All operations for one UE identity run under that identity's map shard
/// lock, which serializes create/update/delete on the same subscription.
#[derive(Debug, Default)]
pub struct InMemoryEeStore {
    subscriptions: DashMap<String, HashMap<String, EeSubscription>>,
}

impl InMemoryEeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, ue_identity: &str, subscription_id: &str) -> Option<EeSubscription> {
        self.subscriptions
            .get(ue_identity)
            .and_then(|subs| subs.get(subscription_id).cloned())
    }

    /// Number of subscriptions held for `ue_identity`.
    pub fn count(&self, ue_identity: &str) -> usize {
        self.subscriptions
            .get(ue_identity)
            .map(|subs| subs.len())
            .unwrap_or(0)
    }
}

#[async_trait]
impl EeSubscriptionService for InMemoryEeStore {
    async fn create_ee_subscription(
        &self,
        ue_identity: &str,
        mut subscription: EeSubscription,
    ) -> Result<Option<EeSubscription>, ProblemDetails> {
        if subscription.get(EeSubscription::CALLBACK_REFERENCE).is_none() {
            return Err(ProblemDetails::new(StatusCode::BAD_REQUEST)
                .with_title("Mandatory IE missing")
                .with_detail("callbackReference is required")
                .with_cause(cause::MANDATORY_IE_MISSING));
        }

        let subscription_id = Uuid::new_v4().to_string();
        subscription.set_subscription_id(subscription_id.clone());

        self.subscriptions
            .entry(ue_identity.to_string())
            .or_default()
            .insert(subscription_id.clone(), subscription.clone());

        tracing::debug!(ue_identity, subscription_id = %subscription_id, "EE subscription created");
        Ok(Some(subscription))
    }

    async fn delete_ee_subscription(&self, ue_identity: &str, subscription_id: &str) {
        let removed = self
            .subscriptions
            .get_mut(ue_identity)
            .and_then(|mut subs| subs.remove(subscription_id))
            .is_some();
        self.subscriptions
            .remove_if(ue_identity, |_, subs| subs.is_empty());

        tracing::debug!(ue_identity, subscription_id, removed, "EE subscription delete");
    }

    async fn update_ee_subscription(
        &self,
        ue_identity: &str,
        subscription_id: &str,
        patch: Vec<PatchItem>,
    ) -> Result<(), ProblemDetails> {
        let not_found = || {
            ProblemDetails::new(StatusCode::NOT_FOUND)
                .with_title("Subscription not found")
                .with_detail(format!("no subscription {subscription_id} for {ue_identity}"))
                .with_cause(cause::SUBSCRIPTION_NOT_FOUND)
        };

        let mut subs = self.subscriptions.get_mut(ue_identity).ok_or_else(not_found)?;
        let current = subs.get_mut(subscription_id).ok_or_else(not_found)?;

        let invalid = |detail: String| {
            ProblemDetails::new(StatusCode::BAD_REQUEST)
                .with_title("Invalid patch")
                .with_detail(detail)
                .with_cause(cause::INVALID_PATCH)
        };

        let patched = apply_patch(&current.clone().into_value(), &patch)
            .map_err(|e| invalid(e.to_string()))?;
        let mut patched = EeSubscription::try_from(patched)
            .map_err(|_| invalid("patched subscription is not an object".into()))?;
        patched.set_subscription_id(subscription_id);

        *current = patched;
        Ok(())
    }
}
