//! User endpoint integration tests
//!
//! Live tests against the AdminPortal backend; run with a reachable
//! `API_TEST_BASE_URL`. Cases share backend state, so they run serially.

mod common;

use adminportal_harness::suites::users;
use serial_test::serial;

#[test_log::test(tokio::test)]
#[serial]
async fn test_create_user_success() {
    common::run_live_case(users::suite(), "create_user_success").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_create_user_duplicate_username() {
    common::run_live_case(users::suite(), "create_user_duplicate_username").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_create_user_invalid_data() {
    common::run_live_case(users::suite(), "create_user_invalid_data").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_get_user_success() {
    common::run_live_case(users::suite(), "get_user_success").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_get_user_not_found() {
    common::run_live_case(users::suite(), "get_user_not_found").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_update_user_success() {
    common::run_live_case(users::suite(), "update_user_success").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_update_user_not_found() {
    common::run_live_case(users::suite(), "update_user_not_found").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_update_user_username_conflict() {
    common::run_live_case(users::suite(), "update_user_username_conflict").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_delete_user_success() {
    common::run_live_case(users::suite(), "delete_user_success").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_delete_user_not_found() {
    common::run_live_case(users::suite(), "delete_user_not_found").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_delete_current_user_conflict() {
    common::run_live_case(users::suite(), "delete_current_user_conflict").await;
}

#[test_log::test(tokio::test)]
#[serial]
async fn test_unauthorized_access() {
    common::run_live_case(users::suite(), "unauthorized_access").await;
}
