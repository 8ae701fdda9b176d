//! Teardown errors

use adminportal_client::ApiError;

/// Cleanup problems serious enough to fail the case.
///
/// Per-test users that cannot be deleted only produce warnings; these
/// variants cover shared state the next case or run depends on.
#[derive(Debug, thiserror::Error)]
pub enum TeardownError {
    #[error("Critical cleanup failure: could not get cleanup session: {source}")]
    CleanupSession {
        #[source]
        source: ApiError,
        fixtures_pending: bool,
    },

    #[error("Critical cleanup failure: could not revert company '{company}' to '{expected}' (status {status}): {body}")]
    FixtureNotRestored {
        company: String,
        expected: String,
        status: u16,
        body: String,
    },

    #[error("Critical cleanup failure: request reverting company '{company}' failed: {source}")]
    FixtureRequest {
        company: String,
        #[source]
        source: ApiError,
    },
}

impl TeardownError {
    /// Shared fixtures are left mutated; nothing after this can be trusted.
    pub fn corrupts_run(&self) -> bool {
        match self {
            TeardownError::CleanupSession {
                fixtures_pending, ..
            } => *fixtures_pending,
            TeardownError::FixtureNotRestored { .. } | TeardownError::FixtureRequest { .. } => true,
        }
    }
}
