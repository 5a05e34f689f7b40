//! Error handlers
//!
//! Maps domain errors to protocol reply codes.

use crate::error::types::{AuthError, ServerError};
use crate::protocol::responses;
use log::error;

/// Handle a service error
pub fn handle_error(err: &ServerError) {
    error!("Auth server error: {}", err);
}

/// Convert an auth error to its protocol reply code
pub fn error_to_reply_code(err: &AuthError) -> u16 {
    match err {
        AuthError::DuplicateUsername { .. } => responses::DUPLICATE_USERNAME,
        AuthError::UserNotFound { .. } => responses::USER_NOT_FOUND,
        AuthError::IncorrectPassword { .. } => responses::AUTH_FAILED,
        AuthError::LockedOut { .. } => responses::LOCKED_OUT,
        AuthError::InvalidInput { .. } => responses::SYNTAX_ERROR,
    }
}
