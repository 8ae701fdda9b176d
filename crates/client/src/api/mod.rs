//! Resource API clients
//!
//! One function per endpoint. Each performs exactly one request and hands
//! back the buffered response; status codes are for the caller to judge.

pub mod companies;
pub mod sessions;
pub mod users;
