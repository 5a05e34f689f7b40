//! Error types
//!
//! `AuthError` covers the expected, user-facing outcomes of the account
//! operations. `ServerError` covers startup and I/O failures of the service.

use serde::Serialize;
use std::io;
use thiserror::Error;

/// Authentication and account errors.
///
/// Serializes with an internal `error` tag, e.g.
/// `{"error":"IncorrectPassword","attempts_remaining":2}`.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error")]
pub enum AuthError {
    #[error("Username already exists: {username}")]
    DuplicateUsername { username: String },

    #[error("User not found: {username}")]
    UserNotFound { username: String },

    #[error("Incorrect password, {attempts_remaining} attempt(s) left")]
    IncorrectPassword { attempts_remaining: u32 },

    #[error("Locked out, try again in {seconds} seconds")]
    LockedOut { seconds: u64 },

    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },
}

impl AuthError {
    /// Stable name of the error kind, as it appears in reply bodies
    pub fn kind(&self) -> &'static str {
        match self {
            AuthError::DuplicateUsername { .. } => "DuplicateUsername",
            AuthError::UserNotFound { .. } => "UserNotFound",
            AuthError::IncorrectPassword { .. } => "IncorrectPassword",
            AuthError::LockedOut { .. } => "LockedOut",
            AuthError::InvalidInput { .. } => "InvalidInput",
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        AuthError::InvalidInput {
            reason: reason.into(),
        }
    }
}

/// Service-level errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Failed to bind to {addr}: {source}")]
    Bind { addr: String, source: io::Error },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
