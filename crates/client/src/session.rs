//! Authenticated test sessions
//!
//! An [`ApiSession`] pairs a reqwest client with the harness-owned
//! [`CookieJar`]. Every request is sent through [`ApiSession::send`], which
//! builds the `Cookie` header from the jar (plus any per-request
//! [`CookieOverrides`]) and absorbs `Set-Cookie` from the response.

use std::sync::Arc;

use reqwest::header::{HeaderValue, COOKIE};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::api;
use crate::claims::SessionClaims;
use crate::config::ApiConfig;
use crate::cookies::{CookieJar, CookieOverrides, ACCESS_TOKEN};
use crate::error::{ApiError, Result};
use crate::response::ApiResponse;
use crate::trace;

/// One request as the session will send it
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    url: Url,
    body: Option<Value>,
    overrides: CookieOverrides,
}

impl ApiRequest {
    pub fn new(method: Method, url: Url) -> Self {
        Self {
            method,
            url,
            body: None,
            overrides: CookieOverrides::new(),
        }
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn cookies(mut self, overrides: CookieOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// HTTP client state for one simulated browser session
#[derive(Debug, Clone)]
pub struct ApiSession {
    config: Arc<ApiConfig>,
    http: reqwest::Client,
    jar: CookieJar,
}

impl ApiSession {
    /// A session with an empty jar.
    pub fn anonymous(config: Arc<ApiConfig>) -> Result<Self> {
        let http = config.http_client()?;
        Ok(Self {
            config,
            http,
            jar: CookieJar::new(),
        })
    }

    /// Log in through the dev-login bypass and return the populated session.
    ///
    /// The endpoint answers with a redirect carrying the auth cookies; any
    /// other status, or a redirect without a usable `access_token`, is an
    /// error. There is no retry.
    pub async fn dev_login(config: Arc<ApiConfig>, username: &str, company: &str) -> Result<Self> {
        let mut session = Self::anonymous(config)?;
        let response = api::sessions::dev_login(&mut session, username, company).await?;

        if !is_login_redirect(response.status()) {
            tracing::warn!(
                username,
                company,
                status = response.status().as_u16(),
                "Dev login did not redirect"
            );
            return Err(ApiError::LoginRejected {
                status: response.status(),
                body: response.text().to_string(),
            });
        }

        if session.cookie(ACCESS_TOKEN).map_or(true, str::is_empty) {
            tracing::warn!(username, company, "Dev login returned no access token");
            return Err(ApiError::MissingAccessToken);
        }

        tracing::debug!(username, company, "Dev login succeeded");
        Ok(session)
    }

    /// Dev login with the configured account and company.
    pub async fn dev_login_default(config: Arc<ApiConfig>) -> Result<Self> {
        let username = config.dev_username.clone();
        let company = config.dev_company.clone();
        Self::dev_login(config, &username, &company).await
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn shared_config(&self) -> Arc<ApiConfig> {
        Arc::clone(&self.config)
    }

    pub fn cookies(&self) -> &CookieJar {
        &self.jar
    }

    pub fn cookies_mut(&mut self) -> &mut CookieJar {
        &mut self.jar
    }

    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.jar.get(name)
    }

    /// Claims of the current `access_token`, decoded without verification.
    pub fn claims(&self) -> Result<SessionClaims> {
        let token = self
            .cookie(ACCESS_TOKEN)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::MissingAccessToken)?;
        SessionClaims::decode_unverified(token)
    }

    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        self.config.endpoint(segments)
    }

    /// Send one request and fold the response's `Set-Cookie` into the jar.
    pub async fn send(&mut self, request: ApiRequest) -> Result<ApiResponse> {
        let ApiRequest {
            method,
            url,
            body,
            overrides,
        } = request;

        let cookie_header = self.jar.header_value(&overrides);
        let verbose = self.config.verbose;
        trace::log_request(verbose, &method, url.as_str(), cookie_header.as_deref());

        let mut builder = self.http.request(method.clone(), url.clone());
        if let Some(cookie_header) = &cookie_header {
            builder = builder.header(COOKIE, HeaderValue::from_str(cookie_header)?);
        }
        if let Some(body) = &body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!(%method, url = url.as_str(), error = %e, "Request failed");
            e
        })?;
        let response = ApiResponse::read(response).await?;

        self.jar.absorb(response.headers());
        trace::log_response(
            verbose,
            &method,
            url.as_str(),
            response.status(),
            response.text(),
        );

        Ok(response)
    }
}

fn is_login_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::FOUND
            | StatusCode::SEE_OTHER
            | StatusCode::TEMPORARY_REDIRECT
            | StatusCode::PERMANENT_REDIRECT
    )
}
