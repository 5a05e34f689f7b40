//! Session result types
//!
//! Descriptors returned by workflow operations, ready to be rendered by
//! whatever presentation layer drives the workflow.

use serde::Serialize;

/// Result of a successful login
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoginSuccess {
    pub username: String,
    pub transformed: String,
    pub digest: String,
    pub token: String,
    /// Login time rendered in the configured display offset
    pub timestamp: String,
}

/// One row of the user listing. Never carries the raw password.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserSummary {
    pub username: String,
    pub transformed: String,
    pub digest: String,
    pub last_token: String,
    pub history_count: usize,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub timestamp: String,
    pub token: String,
}
