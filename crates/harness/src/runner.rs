//! Sequential case runner
//!
//! Each case gets its own [`TestContext`]: setup, body, then teardown,
//! which runs whatever the body returned.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use adminportal_client::ApiConfig;
use futures::FutureExt;

use crate::context::TestContext;
use crate::outcome::{CaseOutcome, CaseReport, RunSummary};

pub type CaseFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + 'a>>;
pub type CaseFn = for<'a> fn(&'a mut TestContext) -> CaseFuture<'a>;

/// Build a [`TestCase`] from an `async fn name(&mut TestContext) -> anyhow::Result<()>`.
#[macro_export]
macro_rules! case {
    ($name:ident) => {{
        fn run<'a>(ctx: &'a mut $crate::context::TestContext) -> $crate::runner::CaseFuture<'a> {
            ::std::boxed::Box::pin($name(ctx))
        }
        $crate::runner::TestCase {
            name: stringify!($name),
            run,
        }
    }};
}

#[derive(Clone, Copy)]
pub struct TestCase {
    pub name: &'static str,
    pub run: CaseFn,
}

impl fmt::Debug for TestCase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestCase").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone)]
pub struct Suite {
    pub name: &'static str,
    pub cases: Vec<TestCase>,
}

impl Suite {
    pub fn new(name: &'static str, cases: Vec<TestCase>) -> Self {
        Self { name, cases }
    }

    pub fn case(&self, name: &str) -> Option<&TestCase> {
        self.cases.iter().find(|c| c.name == name)
    }
}

/// Returned by a case that cannot run in the current environment.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct SkipCase(pub String);

/// `return Err(skip("..."))` marks the case skipped rather than failed.
pub fn skip(reason: impl Into<String>) -> anyhow::Error {
    SkipCase(reason.into()).into()
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Substring a case name must contain
    pub filter: Option<String>,
    /// Stop after the first failure
    pub failfast: bool,
    /// Print every case outcome, not only failures
    pub report_each: bool,
}

impl RunOptions {
    fn selects(&self, case: &TestCase) -> bool {
        self.filter
            .as_deref()
            .map_or(true, |pattern| case.name.contains(pattern))
    }
}

/// Run one case through setup, body and teardown.
pub async fn run_case(config: Arc<ApiConfig>, suite: &'static str, case: &TestCase) -> CaseReport {
    let started = Instant::now();
    let verbose = config.verbose;
    if verbose {
        tracing::info!(suite, case = case.name, "--- Running case ---");
    }

    let mut ctx = match TestContext::setup(config).await {
        Ok(ctx) => ctx,
        Err(e) => {
            if e.is_environment() {
                tracing::warn!(suite, case = case.name, error = %e, "Backend unavailable, skipping case");
            } else {
                tracing::error!(suite, case = case.name, error = %e, "Setup failed, skipping case");
            }
            return CaseReport {
                suite,
                case: case.name,
                outcome: CaseOutcome::Skipped {
                    reason: format!("Setup failed: could not get authenticated session: {}", e),
                },
                elapsed: started.elapsed(),
            };
        }
    };

    // A panicking body must not skip teardown
    let result = AssertUnwindSafe((case.run)(&mut ctx)).catch_unwind().await;

    let mut outcome = match result {
        Ok(Ok(())) => CaseOutcome::Passed,
        Ok(Err(e)) => match e.downcast_ref::<SkipCase>() {
            Some(SkipCase(reason)) => CaseOutcome::Skipped {
                reason: reason.clone(),
            },
            None => {
                tracing::error!(suite, case = case.name, error = %format!("{:#}", e), "Case failed");
                CaseOutcome::Failed {
                    message: format!("{:#}", e),
                    fatal: false,
                }
            }
        },
        Err(panic) => {
            let message = format!("case panicked: {}", panic_message(&*panic));
            tracing::error!(suite, case = case.name, error = %message, "Case panicked");
            CaseOutcome::Failed {
                message,
                fatal: false,
            }
        }
    };

    if let Err(e) = ctx.teardown().await {
        tracing::error!(suite, case = case.name, error = %e, "Teardown failed");
        let fatal = e.corrupts_run();
        outcome = match outcome {
            CaseOutcome::Failed { message, .. } => CaseOutcome::Failed {
                message: format!("{}\n{}", message, e),
                fatal,
            },
            _ => CaseOutcome::Failed {
                message: e.to_string(),
                fatal,
            },
        };
    }

    CaseReport {
        suite,
        case: case.name,
        outcome,
        elapsed: started.elapsed(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("non-string panic payload")
}

/// Process-wide stop flag for runs driven one case at a time, such as
/// `cargo test` entry points that cannot share a [`RunSummary`].
#[derive(Debug, Default)]
pub struct AbortSwitch {
    tripped: AtomicBool,
}

impl AbortSwitch {
    pub const fn new() -> Self {
        Self {
            tripped: AtomicBool::new(false),
        }
    }

    pub fn is_tripped(&self) -> bool {
        self.tripped.load(Ordering::SeqCst)
    }

    pub fn trip(&self) {
        self.tripped.store(true, Ordering::SeqCst);
    }

    /// Run `case` unless an earlier case left shared fixtures mutated.
    ///
    /// Once tripped, every later case fails without touching the backend.
    pub async fn run_case(
        &self,
        config: Arc<ApiConfig>,
        suite: &'static str,
        case: &TestCase,
    ) -> CaseReport {
        if self.is_tripped() {
            return CaseReport {
                suite,
                case: case.name,
                outcome: CaseOutcome::Failed {
                    message: "run aborted after a critical cleanup failure".to_string(),
                    fatal: true,
                },
                elapsed: Duration::ZERO,
            };
        }

        let report = run_case(config, suite, case).await;
        if report.outcome.is_fatal() {
            self.trip();
        }
        report
    }
}

/// Run the selected cases of `suites` one after another.
pub async fn run_suites(config: Arc<ApiConfig>, suites: &[Suite], options: &RunOptions) -> RunSummary {
    let mut summary = RunSummary::default();

    'suites: for suite in suites {
        for case in suite.cases.iter().filter(|c| options.selects(c)) {
            let report = run_case(Arc::clone(&config), suite.name, case).await;
            print_report(&report, options.report_each);

            let stop = report.outcome.is_fatal() || (options.failfast && report.outcome.is_failure());
            if report.outcome.is_fatal() {
                eprintln!("❌ Critical cleanup failure in {}, aborting run", report.id());
            }
            summary.reports.push(report);

            if stop {
                summary.aborted = true;
                break 'suites;
            }
        }
    }

    summary
}

fn print_report(report: &CaseReport, report_each: bool) {
    match &report.outcome {
        CaseOutcome::Passed if report_each => {
            println!("✅ {} ({:.2}s)", report.id(), report.elapsed.as_secs_f64())
        }
        CaseOutcome::Skipped { reason } if report_each => {
            eprintln!("⚠️  {} skipped: {}", report.id(), reason)
        }
        CaseOutcome::Failed { message, .. } => eprintln!("❌ {}: {}", report.id(), message),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expect;
    use adminportal_client::api::users;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn passes(_ctx: &mut TestContext) -> anyhow::Result<()> {
        Ok(())
    }

    async fn fails(ctx: &mut TestContext) -> anyhow::Result<()> {
        let response = users::get_user(&mut ctx.session, "cbraatz").await?;
        expect::status(&response, 200)
    }

    async fn skips(_ctx: &mut TestContext) -> anyhow::Result<()> {
        Err(skip("not configured"))
    }

    async fn renames(ctx: &mut TestContext) -> anyhow::Result<()> {
        ctx.restore_company_name_on_teardown("BRAUNS", "Brauns Express Inc");
        Ok(())
    }

    async fn renames_then_panics(ctx: &mut TestContext) -> anyhow::Result<()> {
        ctx.restore_company_name_on_teardown("BRAUNS", "Brauns Express Inc");
        let names: Vec<&str> = Vec::new();
        let first = names[0];
        tracing::debug!(first, "renamed");
        Ok(())
    }

    fn suite() -> Suite {
        Suite::new(
            "demo",
            vec![case!(passes), case!(fails), case!(skips), case!(renames)],
        )
    }

    async fn backend() -> (MockServer, Arc<ApiConfig>) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/sessions/dev-login"))
            .respond_with(
                ResponseTemplate::new(302)
                    .append_header("set-cookie", "access_token=aaa.bbb.ccc; path=/"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/sessions/logout"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/users/cbraatz"))
            .respond_with(ResponseTemplate::new(500).set_body_string("db down"))
            .mount(&server)
            .await;
        let config = Arc::new(ApiConfig::new(&format!("{}/v1", server.uri())).unwrap());
        (server, config)
    }

    #[test]
    fn test_case_macro_names_cases() {
        let suite = suite();
        assert_eq!(suite.case("fails").unwrap().name, "fails");
        assert!(suite.case("missing").is_none());
    }

    #[tokio::test]
    async fn test_run_case_outcomes() {
        let (_server, config) = backend().await;
        let suite = suite();

        let passed = run_case(Arc::clone(&config), "demo", suite.case("passes").unwrap()).await;
        assert_eq!(passed.outcome, CaseOutcome::Passed);

        let failed = run_case(Arc::clone(&config), "demo", suite.case("fails").unwrap()).await;
        match failed.outcome {
            CaseOutcome::Failed { message, fatal } => {
                assert!(message.contains("db down"));
                assert!(!fatal);
            }
            other => panic!("unexpected outcome: {other}"),
        }

        let skipped = run_case(config, "demo", suite.case("skips").unwrap()).await;
        assert_eq!(
            skipped.outcome,
            CaseOutcome::Skipped {
                reason: "not configured".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_setup_failure_skips_case() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;
        let config = Arc::new(ApiConfig::new(&format!("{}/v1", server.uri())).unwrap());

        let report = run_case(config, "demo", &case!(passes)).await;
        assert!(matches!(report.outcome, CaseOutcome::Skipped { .. }));
    }

    #[tokio::test]
    async fn test_fatal_teardown_aborts_run() {
        let (server, config) = backend().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let suites = vec![
            Suite::new("fixtures", vec![case!(renames)]),
            Suite::new("after", vec![case!(passes)]),
        ];
        let summary = run_suites(config, &suites, &RunOptions::default()).await;

        assert!(summary.aborted);
        assert_eq!(summary.reports.len(), 1);
        assert!(summary.reports[0].outcome.is_fatal());
    }

    #[tokio::test]
    async fn test_filter_and_failfast() {
        let (_server, config) = backend().await;

        let only_skips = RunOptions {
            filter: Some("kip".to_string()),
            ..RunOptions::default()
        };
        let summary = run_suites(Arc::clone(&config), &[suite()], &only_skips).await;
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.skipped(), 1);
        assert!(summary.is_success());

        let failfast = RunOptions {
            filter: Some("a".to_string()),
            failfast: true,
            report_each: true,
        };
        let summary = run_suites(config, &[suite()], &failfast).await;
        // "passes" then "fails"; "renames" never runs
        assert_eq!(summary.reports.len(), 2);
        assert!(summary.aborted);
        assert_eq!(summary.failed(), 1);
    }

    #[tokio::test]
    async fn test_panicking_case_still_restores_fixture() {
        let (server, config) = backend().await;
        Mock::given(method("PUT"))
            .and(path("/v1/companies/Brauns%20Express%20Inc"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let report = run_case(config, "demo", &case!(renames_then_panics)).await;

        match report.outcome {
            CaseOutcome::Failed { message, fatal } => {
                assert!(message.starts_with("case panicked: index out of bounds"));
                assert!(!fatal);
            }
            other => panic!("unexpected outcome: {other}"),
        }
        let restores = server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|r| r.method.as_str() == "PUT")
            .count();
        assert_eq!(restores, 1);
    }

    #[tokio::test]
    async fn test_abort_switch_stops_later_cases() {
        let (server, config) = backend().await;
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        let switch = AbortSwitch::new();

        let first = switch
            .run_case(Arc::clone(&config), "demo", &case!(renames))
            .await;
        assert!(first.outcome.is_fatal());
        assert!(switch.is_tripped());

        let logins_before = server.received_requests().await.unwrap().len();
        let second = switch.run_case(config, "demo", &case!(passes)).await;
        match second.outcome {
            CaseOutcome::Failed { message, fatal } => {
                assert!(message.contains("run aborted"));
                assert!(fatal);
            }
            other => panic!("unexpected outcome: {other}"),
        }
        assert_eq!(server.received_requests().await.unwrap().len(), logins_before);
    }

    #[tokio::test]
    async fn test_abort_switch_stays_open_on_ordinary_failures() {
        let (_server, config) = backend().await;
        let switch = AbortSwitch::new();

        let report = switch.run_case(config, "demo", &case!(fails)).await;
        assert!(report.outcome.is_failure());
        assert!(!switch.is_tripped());
    }
}
