//! `/users` endpoints

use reqwest::Method;

use crate::error::Result;
use crate::models::UserRecord;
use crate::response::ApiResponse;
use crate::session::{ApiRequest, ApiSession};

/// `POST /users`
pub async fn create_user(session: &mut ApiSession, record: &UserRecord) -> Result<ApiResponse> {
    let url = session.endpoint(&["users"])?;
    tracing::debug!(username = %record.username, "Creating user");
    session
        .send(ApiRequest::new(Method::POST, url).json(record)?)
        .await
}

/// `GET /users/{username}`
pub async fn get_user(session: &mut ApiSession, username: &str) -> Result<ApiResponse> {
    let url = session.endpoint(&["users", username])?;
    session.send(ApiRequest::new(Method::GET, url)).await
}

/// `PUT /users/{prevUsername}`; `record.username` may differ to rename.
pub async fn update_user(
    session: &mut ApiSession,
    prev_username: &str,
    record: &UserRecord,
) -> Result<ApiResponse> {
    let url = session.endpoint(&["users", prev_username])?;
    tracing::debug!(prev_username, username = %record.username, "Updating user");
    session
        .send(ApiRequest::new(Method::PUT, url).json(record)?)
        .await
}

/// `DELETE /users/{username}`; 204 on success.
pub async fn delete_user(session: &mut ApiSession, username: &str) -> Result<ApiResponse> {
    let url = session.endpoint(&["users", username])?;
    session.send(ApiRequest::new(Method::DELETE, url)).await
}
