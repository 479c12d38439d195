//! ProblemDetails error payload (RFC 7807 as profiled by 3GPP TS 29.571).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Machine-readable `cause` codes produced by this endpoint.
pub mod cause {
    pub const SYSTEM_FAILURE: &str = "SYSTEM_FAILURE";
    pub const UNSPECIFIED_NF_FAILURE: &str = "UNSPECIFIED_NF_FAILURE";
    pub const MANDATORY_IE_MISSING: &str = "MANDATORY_IE_MISSING";
    pub const INVALID_PATCH: &str = "INVALID_PATCH";
    pub const SUBSCRIPTION_NOT_FOUND: &str = "SUBSCRIPTION_NOT_FOUND";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const INSUFFICIENT_SCOPE: &str = "INSUFFICIENT_SCOPE";
    pub const NOT_IMPLEMENTED: &str = "NOT_IMPLEMENTED";
}

/// A single failure reported to an SBI caller.
///
/// `status` is always the HTTP status of the response carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemDetails {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    pub status: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<String>,
}

impl ProblemDetails {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status: status.as_u16(),
            ..Default::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// 500 for a request body that could not be read off the wire.
    pub fn system_failure(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR)
            .with_title("System failure")
            .with_detail(detail)
            .with_cause(cause::SYSTEM_FAILURE)
    }

    /// 400 for a request body that is not the expected JSON document.
    pub fn malformed_request(err: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST)
            .with_title("Malformed request syntax")
            .with_detail(format!("[Request Body] {err}"))
    }

    /// 400 for path parameters that could not be decoded.
    pub fn malformed_path(err: impl std::fmt::Display) -> Self {
        Self::new(StatusCode::BAD_REQUEST)
            .with_title("Malformed request syntax")
            .with_detail(format!("[Request Path] {err}"))
    }

    /// 500 when the business logic returned neither a result nor an error.
    pub fn unspecified_nf_failure() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR).with_cause(cause::UNSPECIFIED_NF_FAILURE)
    }

    /// HTTP status carried by this problem; out-of-range values map to 500.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl std::fmt::Display for ProblemDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.status)?;
        if let Some(title) = &self.title {
            write!(f, " {title}")?;
        }
        if let Some(cause) = &self.cause {
            write!(f, " [{cause}]")?;
        }
        if let Some(detail) = &self.detail {
            write!(f, ": {detail}")?;
        }
        Ok(())
    }
}

impl IntoResponse for ProblemDetails {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = if status.as_u16() == self.status {
            self
        } else {
            Self {
                status: status.as_u16(),
                ..self
            }
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_members_are_omitted() {
        let json = serde_json::to_value(ProblemDetails::unspecified_nf_failure()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"status": 500, "cause": "UNSPECIFIED_NF_FAILURE"})
        );
    }

    #[test]
    fn malformed_request_shape() {
        let problem = ProblemDetails::malformed_request("expected value at line 1 column 1");
        assert_eq!(problem.status, 400);
        assert_eq!(problem.title.as_deref(), Some("Malformed request syntax"));
        assert_eq!(
            problem.detail.as_deref(),
            Some("[Request Body] expected value at line 1 column 1")
        );
        assert!(problem.cause.is_none());
    }

    #[test]
    fn response_status_follows_problem_status() {
        let response = ProblemDetails::new(StatusCode::FORBIDDEN).into_response();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let bogus = ProblemDetails {
            status: 42,
            ..Default::default()
        };
        assert_eq!(bogus.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn display_is_compact() {
        let problem = ProblemDetails::system_failure("connection reset");
        assert_eq!(
            problem.to_string(),
            "500 System failure [SYSTEM_FAILURE]: connection reset"
        );
    }
}
