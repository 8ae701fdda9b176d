//! Request and response payloads of the AdminPortal v1 API

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Second company every generated test user belongs to
pub const SECONDARY_COMPANY: &str = "NTS";

pub const DEFAULT_TEST_PASSWORD: &str = "TestPassword123!";

/// User record as accepted and echoed by `/users`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct UserRecord {
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    pub powerunit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_company: Option<String>,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub modules: Vec<String>,
}

impl UserRecord {
    /// Fresh record with a collision-free username: `<prefix>_<8 hex>`.
    pub fn unique(prefix: &str, active_company: &str) -> Self {
        let unique_id = Uuid::new_v4().simple().to_string();
        let short_id = &unique_id[..8];

        let mut companies = vec![active_company.to_string()];
        if active_company != SECONDARY_COMPANY {
            companies.push(SECONDARY_COMPANY.to_string());
        }

        Self {
            username: format!("{}_{}", prefix, short_id),
            password: Some(DEFAULT_TEST_PASSWORD.to_string()),
            powerunit: short_id[..3].to_string(),
            active_company: Some(active_company.to_string()),
            companies,
            modules: vec!["admin".to_string(), "deliverymanager".to_string()],
        }
    }
}

/// Body of `POST /sessions/logout/{sessionId}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LogoutRequest {
    pub username: String,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
}

/// `{ "message": ... }` envelope most endpoints answer with
#[derive(Debug, Clone, Deserialize)]
pub struct MessageBody {
    pub message: String,
}
