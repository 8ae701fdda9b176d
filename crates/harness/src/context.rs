//! Per-case state: the authenticated session plus everything teardown
//! has to undo.

use std::collections::BTreeSet;
use std::mem;
use std::sync::Arc;

use adminportal_client::api::{sessions, users};
use adminportal_client::cookies::ACCESS_TOKEN;
use adminportal_client::{ApiConfig, ApiResponse, ApiSession, UserRecord};

use crate::error::TeardownError;
use crate::fixture::SharedFixture;

/// What teardown managed to clean up
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TeardownReport {
    pub fixtures_restored: usize,
    pub users_deleted: usize,
    /// Best-effort steps that did not go through
    pub warnings: Vec<String>,
}

/// Everything one case works with.
///
/// Created by [`TestContext::setup`] and consumed by
/// [`TestContext::teardown`]; the runner always calls both.
pub struct TestContext {
    /// Main session, logged in as the configured dev user
    pub session: ApiSession,
    config: Arc<ApiConfig>,
    users: BTreeSet<String>,
    fixtures: Vec<SharedFixture>,
}

impl TestContext {
    /// Provision the default dev session for a case.
    pub async fn setup(config: Arc<ApiConfig>) -> adminportal_client::Result<Self> {
        let session = ApiSession::dev_login_default(Arc::clone(&config)).await?;
        Ok(Self {
            session,
            config,
            users: BTreeSet::new(),
            fixtures: Vec::new(),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// A cookie-less session against the same backend.
    pub fn anonymous_session(&self) -> adminportal_client::Result<ApiSession> {
        ApiSession::anonymous(Arc::clone(&self.config))
    }

    /// A unique user record under the configured dev company.
    pub fn unique_user(&self, prefix: &str) -> UserRecord {
        UserRecord::unique(prefix, &self.config.dev_company)
    }

    pub fn tracked_users(&self) -> impl Iterator<Item = &str> {
        self.users.iter().map(String::as_str)
    }

    pub fn track_user(&mut self, username: impl Into<String>) {
        self.users.insert(username.into());
    }

    /// `POST /users`; the username is tracked for cleanup on 201.
    pub async fn create_and_track_user(
        &mut self,
        record: &UserRecord,
    ) -> adminportal_client::Result<ApiResponse> {
        let response = users::create_user(&mut self.session, record).await?;
        if response.status().as_u16() == 201 {
            self.track_user(record.username.clone());
        }
        Ok(response)
    }

    /// `PUT /users/{prev}`; on 200 tracking follows a rename.
    pub async fn update_and_track_user(
        &mut self,
        prev_username: &str,
        record: &UserRecord,
    ) -> adminportal_client::Result<ApiResponse> {
        let response = users::update_user(&mut self.session, prev_username, record).await?;
        if response.status().as_u16() == 200 {
            if self.users.remove(prev_username) {
                self.users.insert(record.username.clone());
            } else {
                self.track_user(record.username.clone());
            }
        }
        Ok(response)
    }

    /// `DELETE /users/{username}`; untracked on 204, or on 404 when the
    /// user is expected to be gone already.
    pub async fn delete_and_untrack_user(
        &mut self,
        username: &str,
        expect_missing: bool,
    ) -> adminportal_client::Result<ApiResponse> {
        let response = users::delete_user(&mut self.session, username).await?;
        let status = response.status().as_u16();
        if status == 204 || (expect_missing && status == 404) {
            self.users.remove(username);
        }
        Ok(response)
    }

    /// Record that `company`'s display name must be `original_name` again
    /// once the case is over. Call before renaming.
    pub fn restore_company_name_on_teardown(&mut self, company: &str, original_name: &str) {
        let fixture = SharedFixture::company_name(company, original_name);
        if !self.fixtures.contains(&fixture) {
            self.fixtures.push(fixture);
        }
    }

    /// Undo everything the case left behind and end its sessions.
    ///
    /// User deletion and logout are best effort and only add warnings.
    /// Fixture restoration is not: the first failure is returned after the
    /// remaining cleanup has been attempted.
    pub async fn teardown(mut self) -> Result<TeardownReport, TeardownError> {
        let fixtures = mem::take(&mut self.fixtures);
        let users = mem::take(&mut self.users);
        let mut report = TeardownReport::default();
        let mut failure = None;

        if !fixtures.is_empty() || !users.is_empty() {
            match ApiSession::dev_login_default(Arc::clone(&self.config)).await {
                Ok(mut cleanup) => {
                    for fixture in &fixtures {
                        match fixture.restore(&mut cleanup).await {
                            Ok(()) => report.fixtures_restored += 1,
                            Err(e) => {
                                tracing::error!(error = %e, "Fixture restore failed");
                                failure.get_or_insert(e);
                            }
                        }
                    }

                    for username in &users {
                        delete_tracked_user(&mut cleanup, username, &mut report).await;
                    }

                    end_session(&mut cleanup, "cleanup", &mut report).await;
                }
                Err(source) => {
                    tracing::error!(error = %source, "Could not get cleanup session");
                    if !users.is_empty() {
                        report.warnings.push(format!(
                            "lingering users may remain: {}",
                            users.iter().cloned().collect::<Vec<_>>().join(", ")
                        ));
                    }
                    failure = Some(TeardownError::CleanupSession {
                        source,
                        fixtures_pending: !fixtures.is_empty(),
                    });
                }
            }
        }

        if self.session.cookies().contains(ACCESS_TOKEN) {
            end_session(&mut self.session, "main", &mut report).await;
        }
        self.session.cookies_mut().clear();

        for warning in &report.warnings {
            tracing::warn!("{}", warning);
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(report),
        }
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        if !self.fixtures.is_empty() || !self.users.is_empty() {
            tracing::warn!(
                fixtures = self.fixtures.len(),
                users = self.users.len(),
                "Test context dropped without teardown"
            );
        }
    }
}

async fn delete_tracked_user(session: &mut ApiSession, username: &str, report: &mut TeardownReport) {
    match users::delete_user(session, username).await {
        Ok(response) => match response.status().as_u16() {
            204 => {
                tracing::debug!(username, "Cleanup deleted user");
                report.users_deleted += 1;
            }
            404 => report
                .warnings
                .push(format!("user '{}' not found (likely already deleted)", username)),
            status => report.warnings.push(format!(
                "failed to delete user '{}': status {}: {}",
                username,
                status,
                response.text()
            )),
        },
        Err(e) => report
            .warnings
            .push(format!("error deleting user '{}': {}", username, e)),
    }
}

async fn end_session(session: &mut ApiSession, which: &str, report: &mut TeardownReport) {
    match sessions::logout(session).await {
        Ok(response) if response.status().as_u16() == 200 => {}
        Ok(response) => report.warnings.push(format!(
            "{} session logout returned status {}",
            which,
            response.status().as_u16()
        )),
        Err(e) => report
            .warnings
            .push(format!("{} session logout failed: {}", which, e)),
    }
}
