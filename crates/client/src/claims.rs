//! Access-token introspection
//!
//! Tests need the `sessionId` claim to address per-session endpoints. The
//! signing key belongs to the backend, so tokens are decoded without
//! signature or expiry validation. Never use this for anything but test
//! introspection.

use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// Claims the harness reads from an `access_token`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Backend session row id
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<ClaimId>,
    /// Token id
    #[serde(default)]
    pub jti: Option<String>,
    /// Company the token was issued for
    #[serde(rename = "Company", default)]
    pub company: Option<String>,
    /// Expires at
    #[serde(default)]
    pub exp: Option<u64>,
}

/// A claim the backend may serialise as either a string or a number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClaimId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ClaimId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClaimId::Number(id) => write!(f, "{}", id),
            ClaimId::Text(id) => f.write_str(id),
        }
    }
}

impl SessionClaims {
    /// Decode `token` without verifying its signature.
    pub fn decode_unverified(token: &str) -> Result<Self> {
        let mut validation = Validation::default();
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();

        let data = decode::<SessionClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Access token could not be decoded");
                e
            })?;

        Ok(data.claims)
    }

    /// The `sessionId` claim rendered as a path segment.
    pub fn session_id(&self) -> Result<String> {
        self.session_id
            .as_ref()
            .map(ToString::to_string)
            .ok_or(ApiError::MissingClaim("sessionId"))
    }
}
