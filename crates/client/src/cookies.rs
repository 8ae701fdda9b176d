//! Cookie jar and `Cookie` header construction
//!
//! The backend keys behaviour off individual cookies (`company`,
//! `username`, ...), so the harness owns its jar outright instead of
//! delegating to reqwest's cookie store. Every request builds its `Cookie`
//! header here, optionally replacing or dropping named cookies for that one
//! request without touching what the session has stored.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, NaiveDateTime, Utc};
use percent_encoding::percent_decode_str;
use reqwest::header::{HeaderMap, SET_COOKIE};

use crate::error::Result;

pub const ACCESS_TOKEN: &str = "access_token";
pub const REFRESH_TOKEN: &str = "refresh_token";
pub const COMPANY: &str = "company";
pub const COMPANY_MAPPING: &str = "company_mapping";
pub const MODULE_MAPPING: &str = "module_mapping";
pub const USERNAME: &str = "username";
pub const RETURN: &str = "return";

/// Company key → display name, as carried in the `company_mapping` cookie.
pub type CompanyMapping = BTreeMap<String, String>;

/// Insertion-ordered name/value store fed by `Set-Cookie` responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieJar {
    cookies: Vec<(String, String)>,
}

impl CookieJar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.cookies
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Set a cookie, replacing an existing value in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.cookies.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.cookies.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let index = self.cookies.iter().position(|(key, _)| key == name)?;
        Some(self.cookies.remove(index).1)
    }

    pub fn clear(&mut self) {
        self.cookies.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.cookies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cookies.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cookies
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Apply every `Set-Cookie` header of a response.
    pub fn absorb(&mut self, headers: &HeaderMap) {
        for raw in headers.get_all(SET_COOKIE) {
            let Ok(raw) = raw.to_str() else {
                tracing::debug!("Skipping non-UTF-8 Set-Cookie header");
                continue;
            };
            match SetCookie::parse(raw) {
                Some(cookie) => self.apply(cookie),
                None => tracing::debug!(header = raw, "Skipping malformed Set-Cookie header"),
            }
        }
    }

    pub fn apply(&mut self, cookie: SetCookie) {
        if cookie.expired {
            self.remove(&cookie.name);
        } else {
            self.set(cookie.name, cookie.value);
        }
    }

    /// Build the `Cookie` header for one request.
    ///
    /// Stored cookies that are neither omitted nor overridden come first, in
    /// jar order, followed by every override. Returns `None` when nothing
    /// remains, in which case no `Cookie` header may be sent.
    pub fn header_value(&self, overrides: &CookieOverrides) -> Option<String> {
        let mut parts: Vec<String> = self
            .iter()
            .filter(|(name, _)| !overrides.omits(name) && !overrides.replaces(name))
            .map(|(name, value)| format!("{}={}", name, value))
            .collect();

        parts.extend(
            overrides
                .replacements()
                .map(|(name, value)| format!("{}={}", name, value)),
        );

        if parts.is_empty() {
            None
        } else {
            Some(parts.join("; "))
        }
    }

    /// Decoded `company_mapping` cookie, if the session carries one.
    pub fn company_mapping(&self) -> Result<Option<CompanyMapping>> {
        self.get(COMPANY_MAPPING).map(decode_mapping).transpose()
    }
}

/// Decode a URL-encoded JSON object of string values.
pub fn decode_mapping(raw: &str) -> Result<CompanyMapping> {
    let decoded = percent_decode_str(raw).decode_utf8_lossy();
    Ok(serde_json::from_str(&decoded)?)
}

/// Per-request cookie replacements and omissions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookieOverrides {
    replace: Vec<(String, String)>,
    omit: BTreeSet<String>,
}

impl CookieOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send `name=value` instead of whatever the jar holds for `name`.
    pub fn replace(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        match self.replace.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.replace.push((name, value)),
        }
        self
    }

    /// Leave `name` out of the request entirely.
    pub fn omit(mut self, name: impl Into<String>) -> Self {
        self.omit.insert(name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.replace.is_empty() && self.omit.is_empty()
    }

    fn omits(&self, name: &str) -> bool {
        self.omit.contains(name)
    }

    fn replaces(&self, name: &str) -> bool {
        self.replace.iter().any(|(key, _)| key == name)
    }

    fn replacements(&self) -> impl Iterator<Item = (&str, &str)> {
        self.replace
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

/// RFC 1123 dates, plus the dashed `Thu, 01-Jan-1970 00:00:00 GMT` form
/// older servers still emit.
fn parse_cookie_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .map(|at| at.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(raw, "%a, %d-%b-%Y %H:%M:%S GMT").map(|at| at.and_utc())
        })
        .ok()
}

/// One parsed `Set-Cookie` header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetCookie {
    pub name: String,
    pub value: String,
    /// `Max-Age <= 0` or `Expires` in the past: the server is deleting it
    pub expired: bool,
}

impl SetCookie {
    pub fn parse(raw: &str) -> Option<Self> {
        Self::parse_at(raw, Utc::now())
    }

    fn parse_at(raw: &str, now: DateTime<Utc>) -> Option<Self> {
        let mut parts = raw.split(';');
        let (name, value) = parts.next()?.split_once('=')?;
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        let mut max_age: Option<i64> = None;
        let mut expires: Option<DateTime<Utc>> = None;
        for attribute in parts {
            let Some((key, attr_value)) = attribute.split_once('=') else {
                continue;
            };
            let attr_value = attr_value.trim();
            match key.trim().to_ascii_lowercase().as_str() {
                "max-age" => max_age = attr_value.parse().ok(),
                "expires" => {
                    expires = parse_cookie_date(attr_value);
                }
                _ => {}
            }
        }

        // Max-Age wins over Expires when both are present
        let expired = match (max_age, expires) {
            (Some(seconds), _) => seconds <= 0,
            (None, Some(at)) => at <= now,
            (None, None) => false,
        };

        Some(Self {
            name: name.to_string(),
            value: value.trim().to_string(),
            expired,
        })
    }
}
