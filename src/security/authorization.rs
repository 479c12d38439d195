//! Per-service authorization gate.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::context::{SelfContextProvider, ServiceName};
use crate::models::ProblemDetails;
use crate::security::token::bearer_token;

/// Checks that a caller may access one logical service.
///
/// One instance is attached to each authorized route group; the gate never
/// mutates the request.
#[derive(Clone)]
pub struct RouterAuthorizationCheck {
    service: ServiceName,
    context: Arc<dyn SelfContextProvider>,
}

impl RouterAuthorizationCheck {
    pub fn new(service: ServiceName, context: Arc<dyn SelfContextProvider>) -> Self {
        Self { service, context }
    }

    /// Allow, or deny with a 4xx ProblemDetails.
    pub fn check(&self, headers: &HeaderMap) -> Result<(), ProblemDetails> {
        self.context
            .authorize(bearer_token(headers), self.service)
            .map_err(|err| {
                tracing::warn!(service = %self.service, error = %err, "Authorization check failed");
                err.to_problem()
            })
    }
}

impl std::fmt::Debug for RouterAuthorizationCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterAuthorizationCheck")
            .field("service", &self.service)
            .finish()
    }
}
