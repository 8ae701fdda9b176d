//! Shared plumbing for the live-backend tests
//!
//! Each `#[tokio::test]` runs one harness case against the backend named by
//! `API_TEST_BASE_URL`. When no dev session can be provisioned the case is
//! reported as skipped and the test passes, so `cargo test` stays green on
//! machines without the backend.

use std::sync::Arc;

use adminportal_client::ApiConfig;
use adminportal_harness::{AbortSwitch, CaseOutcome, Suite};

/// Tripped by the first case that leaves shared fixtures mutated; every
/// later test in this binary then fails without touching the backend.
static RUN_ABORT: AbortSwitch = AbortSwitch::new();

/// Run `case` from `suite` and panic unless it passed or was skipped.
pub async fn run_live_case(suite: Suite, case: &str) {
    let config = match ApiConfig::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => panic!("Invalid test configuration: {}", e),
    };
    let Some(test_case) = suite.case(case) else {
        panic!("No case '{}' in suite '{}'", case, suite.name);
    };

    let report = RUN_ABORT.run_case(config, suite.name, test_case).await;
    let id = report.id();
    match &report.outcome {
        CaseOutcome::Passed => println!("✅ {} passed", id),
        CaseOutcome::Skipped { reason } => eprintln!("⚠️  {} skipped: {}", id, reason),
        CaseOutcome::Failed { message, fatal } => {
            if *fatal {
                eprintln!("❌ Shared fixtures may be left mutated; aborting remaining cases");
            }
            panic!("❌ {} failed: {}", id, message);
        }
    }
}
