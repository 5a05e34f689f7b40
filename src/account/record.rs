//! Account and login history records

use chrono::{DateTime, Utc};

/// Stored credential record for a single username.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    username: String,
    transformed: String,
    digest: String,
    last_token: String,
}

impl AccountRecord {
    pub(crate) fn new(username: String, transformed: String, digest: String) -> Self {
        Self {
            username,
            transformed,
            digest,
            last_token: String::new(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// Transformed registration password, kept for display only
    pub fn transformed(&self) -> &str {
        &self.transformed
    }

    /// Hex digest of the transformed password; the only value compared on login
    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Most recent session token, empty until the first successful login
    pub fn last_token(&self) -> &str {
        &self.last_token
    }

    pub(crate) fn set_last_token(&mut self, token: String) {
        self.last_token = token;
    }
}

/// A single successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginEntry {
    pub timestamp: DateTime<Utc>,
    pub token: String,
}

/// Append-only record of successful logins, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginHistory {
    entries: Vec<LoginEntry>,
}

impl LoginHistory {
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[LoginEntry] {
        &self.entries
    }

    pub(crate) fn push(&mut self, timestamp: DateTime<Utc>, token: String) {
        self.entries.push(LoginEntry { timestamp, token });
    }
}
