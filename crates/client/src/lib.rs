//! HTTP client for exercising the AdminPortal v1 API
//!
//! This crate provides the pieces every API test needs:
//! - Configuration loaded once from the environment
//! - Dev-login session provisioning with a harness-owned cookie jar
//! - Per-request cookie overrides for forged/missing cookie scenarios
//! - One client function per sessions/users/companies endpoint
//! - Unverified access-token introspection

pub mod api;
pub mod claims;
pub mod config;
pub mod cookies;
pub mod error;
pub mod models;
pub mod response;
pub mod session;
pub mod trace;

pub use claims::SessionClaims;
pub use config::ApiConfig;
pub use cookies::{CompanyMapping, CookieJar, CookieOverrides, SetCookie};
pub use error::{ApiError, Result};
pub use models::{LogoutRequest, MessageBody, UserRecord};
pub use response::ApiResponse;
pub use session::{ApiRequest, ApiSession};
pub use trace::init_tracing;
