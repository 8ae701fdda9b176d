//! `/sessions` endpoints

use reqwest::Method;

use crate::error::Result;
use crate::models::LogoutRequest;
use crate::response::ApiResponse;
use crate::session::{ApiRequest, ApiSession};

/// `GET /sessions/dev-login?username=..&company=..`
///
/// Raw call; [`ApiSession::dev_login`] wraps it with the redirect and
/// `access_token` checks.
pub async fn dev_login(
    session: &mut ApiSession,
    username: &str,
    company: &str,
) -> Result<ApiResponse> {
    let mut url = session.endpoint(&["sessions", "dev-login"])?;
    url.query_pairs_mut()
        .append_pair("username", username)
        .append_pair("company", company);
    session.send(ApiRequest::new(Method::GET, url)).await
}

/// `GET /sessions/me`: current identity plus company/module mappings.
pub async fn current_session(session: &mut ApiSession) -> Result<ApiResponse> {
    let url = session.endpoint(&["sessions", "me"])?;
    session.send(ApiRequest::new(Method::GET, url)).await
}

/// `POST /sessions/me`: refresh credentials.
pub async fn refresh_credentials(session: &mut ApiSession) -> Result<ApiResponse> {
    let url = session.endpoint(&["sessions", "me"])?;
    session.send(ApiRequest::new(Method::POST, url)).await
}

/// `POST /sessions/return/{sessionId}`: extend the session's cookies.
pub async fn return_session(session: &mut ApiSession, session_id: &str) -> Result<ApiResponse> {
    let url = session.endpoint(&["sessions", "return", session_id])?;
    session.send(ApiRequest::new(Method::POST, url)).await
}

/// `POST /sessions/logout/{sessionId}` with the token pair in the body.
pub async fn logout_session(
    session: &mut ApiSession,
    session_id: &str,
    body: &LogoutRequest,
) -> Result<ApiResponse> {
    let url = session.endpoint(&["sessions", "logout", session_id])?;
    session
        .send(ApiRequest::new(Method::POST, url).json(body)?)
        .await
}

/// `POST /sessions/logout`: end the caller's current session.
pub async fn logout(session: &mut ApiSession) -> Result<ApiResponse> {
    let url = session.endpoint(&["sessions", "logout"])?;
    session.send(ApiRequest::new(Method::POST, url)).await
}
