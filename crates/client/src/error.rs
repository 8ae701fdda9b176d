//! Client error types

use reqwest::StatusCode;

/// Client result type
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors raised while talking to the AdminPortal API.
///
/// HTTP error statuses are *not* errors here: every resource call hands the
/// raw response back so callers can assert on 4xx/5xx bodies. Only transport
/// failures and harness-side protocol problems surface as `ApiError`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Base URL cannot carry path segments: {0}")]
    CannotBeABase(String),

    #[error("Dev login rejected: expected redirect, got {status}: {body}")]
    LoginRejected { status: StatusCode, body: String },

    #[error("Access token missing from dev login cookies")]
    MissingAccessToken,

    #[error("Token decode error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Claim '{0}' not found in access token")]
    MissingClaim(&'static str),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Whether the error means the backend could not be reached or refused
    /// to hand out a session, as opposed to a harness bug.
    pub fn is_environment(&self) -> bool {
        matches!(
            self,
            ApiError::Transport(_) | ApiError::LoginRejected { .. } | ApiError::MissingAccessToken
        )
    }
}
