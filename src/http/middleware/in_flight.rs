//! In-flight request accounting.
//! Holds a [`RequestGuard`](crate::lifecycle::RequestGuard) for the duration of
//! the handler; refuses requests with 503 once shutdown has started.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::lifecycle::RequestTracker;
use crate::models::ProblemDetails;

pub async fn in_flight_middleware(
    State(tracker): State<RequestTracker>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let Some(_guard) = tracker.track() else {
        tracing::debug!(path = %req.uri().path(), "Refusing request while shutting down");
        let problem = ProblemDetails::new(StatusCode::SERVICE_UNAVAILABLE)
            .with_title("Service unavailable")
            .with_detail("SBI server is shutting down");
        return ([(header::CONNECTION, "close")], problem).into_response();
    };
    next.run(req).await
}
