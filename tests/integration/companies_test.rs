//! Company endpoint integration tests
//!
//! Live tests against the AdminPortal backend; run with a reachable
//! `API_TEST_BASE_URL`. Cases share backend state, so they run serially.

mod common;

use adminportal_harness::suites::companies;
use serial_test::serial;

#[test_log::test(tokio::test)]
#[serial]
async fn test_update_company_success() {
    common::run_live_case(companies::suite(), "update_company_success").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_update_company_empty_name() {
    common::run_live_case(companies::suite(), "update_company_empty_name").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_update_company_missing_company_cookie() {
    common::run_live_case(companies::suite(), "update_company_missing_company_cookie").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_update_company_unknown_company() {
    common::run_live_case(companies::suite(), "update_company_unknown_company").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_update_company_unauthorized() {
    common::run_live_case(companies::suite(), "update_company_unauthorized").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_update_company_name_conflict() {
    common::run_live_case(companies::suite(), "update_company_name_conflict").await;
}
