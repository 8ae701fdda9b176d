//! `/companies` endpoints

use reqwest::Method;

use crate::cookies::{CookieOverrides, COMPANY};
use crate::error::Result;
use crate::response::ApiResponse;
use crate::session::{ApiRequest, ApiSession};

/// `PUT /companies/{newName}`: rename the caller's active company.
///
/// The backend reads the company key from the `company` cookie, so
/// `overrides` can forge or drop it for this one request.
pub async fn update_company(
    session: &mut ApiSession,
    new_name: &str,
    overrides: &CookieOverrides,
) -> Result<ApiResponse> {
    let url = session.endpoint(&["companies", new_name])?;
    tracing::debug!(
        company = session.cookie(COMPANY).unwrap_or("N/A (cookie missing)"),
        new_name,
        "Updating company display name"
    );
    session
        .send(ApiRequest::new(Method::PUT, url).cookies(overrides.clone()))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::cookies::{ACCESS_TOKEN, COMPANY_MAPPING};
    use std::sync::Arc;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn session_for(server: &MockServer) -> ApiSession {
        let config = Arc::new(ApiConfig::new(&format!("{}/v1", server.uri())).unwrap());
        let mut session = ApiSession::anonymous(config).unwrap();
        session.cookies_mut().set(COMPANY, "BRAUNS");
        session.cookies_mut().set(ACCESS_TOKEN, "aaa.bbb.ccc");
        session
    }

    #[tokio::test]
    async fn test_update_company_encodes_name_and_refreshes_mapping() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/companies/Brauns%20Express%20Inc_TEMP_7"))
            .and(header("cookie", "company=BRAUNS; access_token=aaa.bbb.ccc"))
            .respond_with(
                ResponseTemplate::new(200)
                    .append_header(
                        "set-cookie",
                        "company_mapping=%7B%22BRAUNS%22%3A%22Brauns%20Express%20Inc_TEMP_7%22%7D; path=/",
                    )
                    .set_body_json(serde_json::json!({ "message": "Company updated successfully." })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut session = session_for(&server).await;
        let response = update_company(&mut session, "Brauns Express Inc_TEMP_7", &CookieOverrides::new())
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 200);
        assert!(session.cookies().contains(COMPANY_MAPPING));
        let mapping = session.cookies().company_mapping().unwrap().unwrap();
        assert_eq!(mapping["BRAUNS"], "Brauns Express Inc_TEMP_7");
    }

    #[tokio::test]
    async fn test_update_company_with_forged_company_cookie() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/companies/ValidNewName"))
            .and(header("cookie", "access_token=aaa.bbb.ccc; company=NONEXISTENT_XYZ_C4T"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "message": "Company with name 'NONEXISTENT_XYZ_C4T' not found."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut session = session_for(&server).await;
        let overrides = CookieOverrides::new().replace(COMPANY, "NONEXISTENT_XYZ_C4T");
        let response = update_company(&mut session, "ValidNewName", &overrides)
            .await
            .unwrap();

        assert_eq!(response.status().as_u16(), 404);
        // the forged value is per-request only
        assert_eq!(session.cookie(COMPANY), Some("BRAUNS"));
    }

    #[tokio::test]
    async fn test_update_company_with_company_cookie_omitted() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/companies/SomeNewName"))
            .and(header("cookie", "access_token=aaa.bbb.ccc"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "message": "Current company name was not found in cookies."
            })))
            .expect(1)
            .mount(&server)
            .await;

        let mut session = session_for(&server).await;
        let response = update_company(&mut session, "SomeNewName", &CookieOverrides::new().omit(COMPANY))
            .await
            .unwrap();

        assert_eq!(
            response.message().as_deref(),
            Some("Current company name was not found in cookies.")
        );
    }

    #[tokio::test]
    async fn test_update_company_empty_name_hits_collection_path() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/companies/"))
            .respond_with(ResponseTemplate::new(405))
            .expect(1)
            .mount(&server)
            .await;

        let mut session = session_for(&server).await;
        let response = update_company(&mut session, "", &CookieOverrides::new())
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 405);
    }
}
