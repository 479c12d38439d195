//! Authorization middleware.
//! Runs the group's gate before any handler of that group.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::security::RouterAuthorizationCheck;

pub async fn authorization_middleware(
    State(gate): State<Arc<RouterAuthorizationCheck>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match gate.check(req.headers()) {
        Ok(()) => next.run(req).await,
        Err(problem) => problem.into_response(),
    }
}
