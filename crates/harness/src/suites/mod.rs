//! The AdminPortal API suites

pub mod companies;
pub mod sessions;
pub mod users;

use crate::runner::Suite;

pub const SUITE_NAMES: [&str; 3] = ["companies", "sessions", "users"];

pub fn all() -> Vec<Suite> {
    vec![companies::suite(), sessions::suite(), users::suite()]
}

pub fn by_name(name: &str) -> Option<Suite> {
    match name {
        "companies" => Some(companies::suite()),
        "sessions" => Some(sessions::suite()),
        "users" => Some(users::suite()),
        _ => None,
    }
}
