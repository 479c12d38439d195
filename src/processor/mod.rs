//! Request processing: HTTP handlers backed by the business-logic collaborators.

pub mod ee_subscription;

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::{rejection::PathRejection, OriginalUri, Path},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::de::DeserializeOwned;

use crate::consumer::EeSubscriptionService;
use crate::models::{cause, ProblemDetails};

pub use ee_subscription::{
    handle_create_ee_subscription, handle_delete_ee_subscription, handle_update_ee_subscription,
};

/// Shared handler state.
pub struct Processor {
    ee: Arc<dyn EeSubscriptionService>,
    max_body_size: usize,
}

impl Processor {
    pub fn new(ee: Arc<dyn EeSubscriptionService>, max_body_size: usize) -> Self {
        Self { ee, max_body_size }
    }

    pub fn ee(&self) -> &dyn EeSubscriptionService {
        self.ee.as_ref()
    }

    /// Read the raw request body. Any failure, including exceeding the size
    /// limit, is a 500 system failure.
    pub async fn read_body(&self, body: Body) -> Result<Bytes, ProblemDetails> {
        axum::body::to_bytes(body, self.max_body_size)
            .await
            .map_err(|err| {
                tracing::error!(error = %err, "Get Request Body error");
                ProblemDetails::system_failure(err.to_string())
            })
    }
}

/// Deserialize a JSON request body, mapping failures to 400.
pub fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ProblemDetails> {
    serde_json::from_slice(bytes).map_err(|err| {
        let problem = ProblemDetails::malformed_request(&err);
        tracing::error!(detail = problem.detail.as_deref().unwrap_or_default(), "Malformed request body");
        problem
    })
}

/// Unwrap extracted path parameters, mapping a rejection (e.g. invalid
/// percent-encoding) to 400.
pub fn decode_path<T>(path: Result<Path<T>, PathRejection>) -> Result<T, ProblemDetails> {
    path.map(|Path(params)| params).map_err(|rejection| {
        let problem = ProblemDetails::malformed_path(rejection.body_text());
        tracing::error!(detail = problem.detail.as_deref().unwrap_or_default(), "Malformed request path");
        problem
    })
}

/// Handler for declared resources whose business logic lives outside this
/// endpoint.
pub async fn handle_not_implemented(method: Method, OriginalUri(uri): OriginalUri) -> Response {
    tracing::warn!(method = %method, path = %uri.path(), "Operation not implemented");
    ProblemDetails::new(StatusCode::NOT_IMPLEMENTED)
        .with_title("Not implemented")
        .with_detail(format!("{method} {} is not supported", uri.path()))
        .with_cause(cause::NOT_IMPLEMENTED)
        .into_response()
}
