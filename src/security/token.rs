//! OAuth2 access token inspection.

use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::{header::AUTHORIZATION, HeaderMap, StatusCode};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::context::ServiceName;
use crate::models::{cause, ProblemDetails};

/// JWT claims expected in an SBA access token (3GPP TS 29.510 6.3.5.2.4).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    /// Issuer (NRF NF instance id).
    pub iss: String,
    /// Subject (NF instance id of the consumer).
    pub sub: String,
    /// Audience (NF type or NF instance id of the producer).
    pub aud: serde_json::Value,
    /// Space-delimited service names.
    pub scope: String,
    /// Expiration time, seconds since epoch.
    pub exp: u64,
}

impl AccessTokenClaims {
    pub fn covers(&self, service: ServiceName) -> bool {
        self.scope.split_whitespace().any(|s| s == service.as_str())
    }

    pub fn is_expired(&self) -> bool {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.exp <= now
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("malformed access token: {0}")]
    MalformedToken(String),
    #[error("access token expired")]
    Expired,
    #[error("access token scope does not cover {0}")]
    InsufficientScope(ServiceName),
}

impl AuthorizationError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InsufficientScope(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn to_problem(&self) -> ProblemDetails {
        let (title, code) = match self {
            Self::InsufficientScope(_) => ("Forbidden", cause::INSUFFICIENT_SCOPE),
            _ => ("Unauthorized", cause::UNAUTHORIZED),
        };
        ProblemDetails::new(self.status())
            .with_title(title)
            .with_detail(self.to_string())
            .with_cause(code)
    }
}

/// Bearer token of the `Authorization` header, if any.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() {
        Some(token.trim())
    } else {
        None
    }
}

/// Decode the claims of a three-part JWT.
///
/// Only the structure and payload are checked; the signature is not verified.
pub fn decode_claims(token: &str) -> Result<AccessTokenClaims, AuthorizationError> {
    let parts: Vec<&str> = token.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthorizationError::MalformedToken(
            "expected 3 dot-separated parts".into(),
        ));
    }

    let payload = URL_SAFE_NO_PAD
        .decode(parts[1])
        .map_err(|e| AuthorizationError::MalformedToken(format!("invalid payload: {e}")))?;

    serde_json::from_slice(&payload)
        .map_err(|e| AuthorizationError::MalformedToken(format!("invalid claims: {e}")))
}
