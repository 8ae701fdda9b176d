//! Assertion helpers for API responses
//!
//! Every failure message carries the actual status and body so a failed
//! case can be diagnosed from the runner output alone.

use std::collections::BTreeSet;

use adminportal_client::ApiResponse;
use anyhow::{bail, ensure, Context};
use serde_json::Value;

fn describe(response: &ApiResponse) -> String {
    format!(
        "status {}, body: {}",
        response.status().as_u16(),
        response.text()
    )
}

pub fn status(response: &ApiResponse, expected: u16) -> anyhow::Result<()> {
    ensure!(
        response.status().as_u16() == expected,
        "expected status {}, got {}",
        expected,
        describe(response)
    );
    Ok(())
}

pub fn status_in(response: &ApiResponse, expected: &[u16]) -> anyhow::Result<()> {
    ensure!(
        expected.contains(&response.status().as_u16()),
        "expected one of {:?}, got {}",
        expected,
        describe(response)
    );
    Ok(())
}

/// The JSON `message` field.
pub fn message(response: &ApiResponse) -> anyhow::Result<String> {
    response
        .message()
        .with_context(|| format!("response has no 'message' ({})", describe(response)))
}

pub fn message_contains(response: &ApiResponse, needle: &str) -> anyhow::Result<()> {
    let message = message(response)?;
    ensure!(
        message.contains(needle),
        "message '{}' does not contain '{}'",
        message,
        needle
    );
    Ok(())
}

pub fn message_contains_ignore_case(response: &ApiResponse, needle: &str) -> anyhow::Result<()> {
    let message = message(response)?;
    ensure!(
        message.to_lowercase().contains(&needle.to_lowercase()),
        "message '{}' does not contain '{}' (case-insensitive)",
        message,
        needle
    );
    Ok(())
}

pub fn body_contains(response: &ApiResponse, needle: &str) -> anyhow::Result<()> {
    ensure!(
        response.text().contains(needle),
        "body does not contain '{}' ({})",
        needle,
        describe(response)
    );
    Ok(())
}

/// The body as JSON.
pub fn json(response: &ApiResponse) -> anyhow::Result<Value> {
    response
        .json()
        .with_context(|| format!("body is not JSON ({})", describe(response)))
}

/// String field of a JSON object.
pub fn str_field<'a>(value: &'a Value, key: &str) -> anyhow::Result<&'a str> {
    match value.get(key) {
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => bail!("field '{}' is not a string: {}", key, other),
        None => bail!("field '{}' missing from {}", key, value),
    }
}

/// Array field of a JSON object.
pub fn array_field<'a>(value: &'a Value, key: &str) -> anyhow::Result<&'a [Value]> {
    match value.get(key) {
        Some(Value::Array(items)) => Ok(items.as_slice()),
        Some(other) => bail!("field '{}' is not an array: {}", key, other),
        None => bail!("field '{}' missing from {}", key, value),
    }
}

/// Order-insensitive comparison.
pub fn same_set<A, E>(field: &str, actual: &[A], expected: &[E]) -> anyhow::Result<()>
where
    A: AsRef<str>,
    E: AsRef<str>,
{
    let actual: BTreeSet<&str> = actual.iter().map(AsRef::as_ref).collect();
    let expected: BTreeSet<&str> = expected.iter().map(AsRef::as_ref).collect();
    ensure!(
        actual == expected,
        "{} mismatch: expected {:?}, got {:?}",
        field,
        expected,
        actual
    );
    Ok(())
}
