//! Harness configuration
//!
//! Everything is read from environment variables (optionally seeded from
//! `.env.test` / `.env`) once, then carried explicitly. Nothing downstream
//! reads the process environment again.

use std::env;
use std::sync::Once;
use std::time::Duration;

use reqwest::redirect::Policy;
use url::Url;

use crate::error::{ApiError, Result};

static INIT: Once = Once::new();

pub const DEFAULT_BASE_URL: &str = "https://localhost:7242/v1";
pub const DEFAULT_DEV_USERNAME: &str = "cbraatz";
pub const DEFAULT_DEV_COMPANY: &str = "BRAUNS";
pub const DEFAULT_DEV_COMPANY_NAME: &str = "Brauns Express Inc";

/// Configuration shared by every session a test run creates.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Versioned API root, e.g. `https://localhost:7242/v1`
    pub base_url: Url,
    /// Account used for dev login; must exist in the target database
    pub dev_username: String,
    /// Company key the dev session is opened under
    pub dev_company: String,
    /// Display name the dev company must carry between runs
    pub dev_company_name: String,
    /// Second pre-existing company display name, enables the rename-conflict case
    pub conflict_company: Option<String>,
    /// Print request/response traces
    pub verbose: bool,
    pub accept_invalid_certs: bool,
    /// `None` leaves the transport default in place
    pub request_timeout: Option<Duration>,
}

impl ApiConfig {
    /// Build a configuration with default dev account values against `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            dev_username: DEFAULT_DEV_USERNAME.to_string(),
            dev_company: DEFAULT_DEV_COMPANY.to_string(),
            dev_company_name: DEFAULT_DEV_COMPANY_NAME.to_string(),
            conflict_company: None,
            verbose: false,
            accept_invalid_certs: true,
            request_timeout: None,
        })
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        INIT.call_once(|| {
            dotenvy::from_filename(".env.test").ok();
            dotenvy::dotenv().ok();
        });

        let base_url =
            env::var("API_TEST_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(&base_url)?;

        if let Ok(username) = env::var("API_TEST_DEV_USERNAME") {
            config.dev_username = username;
        }
        if let Ok(company) = env::var("API_TEST_DEV_COMPANY") {
            config.dev_company = company;
        }
        if let Ok(name) = env::var("API_TEST_DEV_COMPANY_NAME") {
            config.dev_company_name = name;
        }
        config.conflict_company = env::var("API_TEST_CONFLICT_COMPANY")
            .ok()
            .filter(|name| !name.trim().is_empty());
        config.verbose = env::var("API_TEST_VERBOSE")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);
        config.accept_invalid_certs = env::var("API_TEST_ACCEPT_INVALID_CERTS")
            .map(|value| parse_flag(&value))
            .unwrap_or(true);
        config.request_timeout = match env::var("API_TEST_TIMEOUT_SECS") {
            Ok(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    ApiError::Configuration(format!(
                        "API_TEST_TIMEOUT_SECS must be a whole number of seconds, got '{}'",
                        raw
                    ))
                })?;
                Some(Duration::from_secs(secs))
            }
            Err(_) => None,
        };

        Ok(config)
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Resolve `segments` under the base URL, percent-encoding each one.
    ///
    /// An empty segment is kept, so `["companies", ""]` yields `.../companies/`.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::CannotBeABase(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// HTTP client used by every session: no redirects, no cookie store.
    pub fn http_client(&self) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::none())
            .danger_accept_invalid_certs(self.accept_invalid_certs);

        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder.build()?)
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
