//! Session endpoint integration tests
//!
//! Live tests against the AdminPortal backend; run with a reachable
//! `API_TEST_BASE_URL`. Cases share backend state, so they run serially.

mod common;

use adminportal_harness::suites::sessions;
use serial_test::serial;

#[test_log::test(tokio::test)]
#[serial]
async fn test_current_session_success() {
    common::run_live_case(sessions::suite(), "current_session_success").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_current_session_without_cookies() {
    common::run_live_case(sessions::suite(), "current_session_without_cookies").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_logout_session_success() {
    common::run_live_case(sessions::suite(), "logout_session_success").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_return_session_success() {
    common::run_live_case(sessions::suite(), "return_session_success").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_return_session_unauthorized() {
    common::run_live_case(sessions::suite(), "return_session_unauthorized").await;
}
