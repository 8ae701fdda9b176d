//! Shared backend state that cases mutate and teardown puts back

use adminportal_client::api::companies::update_company;
use adminportal_client::cookies::{CookieOverrides, COMPANY};
use adminportal_client::ApiSession;

use crate::error::TeardownError;

/// A mutation of data other cases (and other runs) rely on.
///
/// Recorded on the [`TestContext`](crate::context::TestContext) before the
/// mutating request is sent, so a case that fails halfway still reverts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedFixture {
    /// Display name of a company, keyed by its company key
    CompanyName { company: String, original_name: String },
}

impl SharedFixture {
    pub fn company_name(company: impl Into<String>, original_name: impl Into<String>) -> Self {
        SharedFixture::CompanyName {
            company: company.into(),
            original_name: original_name.into(),
        }
    }

    /// Put the fixture back using `session`.
    ///
    /// The company key is forced through a cookie override so the revert
    /// targets the right company whatever the session's jar holds.
    pub async fn restore(&self, session: &mut ApiSession) -> Result<(), TeardownError> {
        match self {
            SharedFixture::CompanyName {
                company,
                original_name,
            } => {
                tracing::info!(company, original_name, "Reverting company display name");
                let overrides = CookieOverrides::new().replace(COMPANY, company.as_str());
                let response = update_company(session, original_name, &overrides)
                    .await
                    .map_err(|source| TeardownError::FixtureRequest {
                        company: company.clone(),
                        source,
                    })?;

                if response.status().as_u16() != 200 {
                    return Err(TeardownError::FixtureNotRestored {
                        company: company.clone(),
                        expected: original_name.clone(),
                        status: response.status().as_u16(),
                        body: response.text().to_string(),
                    });
                }

                tracing::debug!(company, "Company display name reverted");
                Ok(())
            }
        }
    }
}
