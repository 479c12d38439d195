//! Nudm_EE subscription resource handlers.
//!
//! Failure precedence in every handler: path decoding, body read, body parse,
//! the business-logic result, then the unspecified-failure fallback. Delete
//! reports none of them.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::{EeSubscription, PatchItem, ProblemDetails};
use crate::processor::{decode_body, decode_path, Processor};

/// `POST /{ueIdentity}/ee-subscriptions`
pub async fn handle_create_ee_subscription(
    State(processor): State<Arc<Processor>>,
    path: Result<Path<String>, PathRejection>,
    body: Body,
) -> Response {
    let ue_identity = match decode_path(path) {
        Ok(ue_identity) => ue_identity,
        Err(problem) => return problem.into_response(),
    };
    let bytes = match processor.read_body(body).await {
        Ok(bytes) => bytes,
        Err(problem) => return problem.into_response(),
    };
    let subscription: EeSubscription = match decode_body(&bytes) {
        Ok(subscription) => subscription,
        Err(problem) => return problem.into_response(),
    };

    tracing::info!(ue_identity = %ue_identity, "Handle Create EE Subscription");

    match processor
        .ee()
        .create_ee_subscription(&ue_identity, subscription)
        .await
    {
        Ok(Some(created)) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(problem) => problem.into_response(),
        Ok(None) => ProblemDetails::unspecified_nf_failure().into_response(),
    }
}

/// `DELETE /{ueIdentity}/ee-subscriptions/{subscriptionId}`
///
/// Always 204, whether or not the subscription existed and even when the
/// path parameters cannot be decoded.
pub async fn handle_delete_ee_subscription(
    State(processor): State<Arc<Processor>>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> StatusCode {
    let Ok((ue_identity, subscription_id)) = decode_path(path) else {
        return StatusCode::NO_CONTENT;
    };
    tracing::info!(
        ue_identity = %ue_identity,
        subscription_id = %subscription_id,
        "Handle Delete EE Subscription"
    );

    processor
        .ee()
        .delete_ee_subscription(&ue_identity, &subscription_id)
        .await;
    StatusCode::NO_CONTENT
}

/// `PATCH /{ueIdentity}/ee-subscriptions/{subscriptionId}`
pub async fn handle_update_ee_subscription(
    State(processor): State<Arc<Processor>>,
    path: Result<Path<(String, String)>, PathRejection>,
    body: Body,
) -> Response {
    let (ue_identity, subscription_id) = match decode_path(path) {
        Ok(ids) => ids,
        Err(problem) => return problem.into_response(),
    };
    let bytes = match processor.read_body(body).await {
        Ok(bytes) => bytes,
        Err(problem) => return problem.into_response(),
    };
    let patch: Vec<PatchItem> = match decode_body(&bytes) {
        Ok(patch) => patch,
        Err(problem) => return problem.into_response(),
    };

    tracing::info!(
        ue_identity = %ue_identity,
        subscription_id = %subscription_id,
        operations = patch.len(),
        "Handle Update EE Subscription"
    );

    match processor
        .ee()
        .update_ee_subscription(&ue_identity, &subscription_id, patch)
        .await
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(problem) => problem.into_response(),
    }
}
