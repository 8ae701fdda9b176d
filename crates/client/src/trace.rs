//! Request/response tracing
//!
//! Verbose sessions log exchanges at `info`; otherwise they are only visible
//! with `RUST_LOG=debug`.

use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

macro_rules! exchange_event {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+);
        } else {
            tracing::debug!($($arg)+);
        }
    };
}

/// Install a global fmt subscriber honouring `RUST_LOG` (default `info`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

pub(crate) fn log_request(verbose: bool, method: &Method, url: &str, cookie_header: Option<&str>) {
    let cookie_names = cookie_header.map(cookie_names).unwrap_or_default();
    exchange_event!(verbose, %method, url, cookies = %cookie_names, "> request");
}

pub(crate) fn log_response(verbose: bool, method: &Method, url: &str, status: StatusCode, body: &str) {
    let rendered = render_body(body);
    exchange_event!(verbose, %method, url, status = status.as_u16(), body = %rendered, "< response");
}

/// Pretty JSON when the body parses, raw text otherwise.
pub fn render_body(body: &str) -> String {
    if body.trim().is_empty() {
        return String::new();
    }
    match serde_json::from_str::<Value>(body) {
        Ok(json) => serde_json::to_string_pretty(&json).unwrap_or_else(|_| body.to_string()),
        Err(_) => body.to_string(),
    }
}

/// Cookie names only; values carry live tokens.
fn cookie_names(header: &str) -> String {
    header
        .split("; ")
        .filter_map(|pair| pair.split_once('=').map(|(name, _)| name))
        .collect::<Vec<_>>()
        .join(",")
}
