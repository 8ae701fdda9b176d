//! Test runtime and suites for the AdminPortal v1 API
//!
//! A case is an `async fn(&mut TestContext) -> anyhow::Result<()>`. The
//! runner provisions the context, runs the case, and always tears the
//! context down: tracked users are deleted, shared fixtures restored and
//! sessions logged out.

pub mod context;
pub mod error;
pub mod expect;
pub mod fixture;
pub mod outcome;
pub mod runner;
pub mod suites;

pub use context::{TeardownReport, TestContext};
pub use error::TeardownError;
pub use fixture::SharedFixture;
pub use outcome::{CaseOutcome, CaseReport, RunSummary};
pub use runner::{run_case, AbortSwitch, run_suites, skip, RunOptions, SkipCase, Suite, TestCase};
