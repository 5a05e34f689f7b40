//! Session workflow implementation

use chrono::{DateTime, FixedOffset, Offset, Utc};
use log::{info, warn};
use rand::Rng;

use crate::account::AccountStore;
use crate::auth::{AttemptTracker, TokenMode, digest, flip_flop_transform, generate_token};
use crate::config::AuthPolicy;
use crate::error::AuthError;
use crate::session::results::{HistoryEntry, LoginSuccess, UserSummary};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Owns the account store and the attempt tracker. All mutation of either
/// goes through this type.
pub struct SessionWorkflow {
    store: AccountStore,
    attempts: AttemptTracker,
    token_mode: TokenMode,
    display_offset: FixedOffset,
    max_username_length: usize,
    max_password_length: usize,
}

impl SessionWorkflow {
    pub fn new(policy: &AuthPolicy) -> Self {
        let display_offset = FixedOffset::east_opt(policy.utc_offset_minutes * 60)
            .unwrap_or_else(|| Utc.fix());

        Self {
            store: AccountStore::new(),
            attempts: AttemptTracker::new(policy.lockout_policy()),
            token_mode: policy.token_mode,
            display_offset,
            max_username_length: policy.max_username_length,
            max_password_length: policy.max_password_length,
        }
    }

    pub fn store(&self) -> &AccountStore {
        &self.store
    }

    pub fn attempts(&self) -> &AttemptTracker {
        &self.attempts
    }

    pub fn register(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        self.validate_credentials(username, password)?;
        self.store.register(username, password)
    }

    /// Attempts a login at `now`.
    ///
    /// Unknown users fail before any attempt tracking. An active lockout
    /// rejects the attempt without checking the password.
    pub fn login(
        &mut self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<LoginSuccess, AuthError> {
        self.validate_credentials(username, password)?;

        let stored_digest = match self.store.lookup(username) {
            Some(record) => record.digest().to_string(),
            None => {
                return Err(AuthError::UserNotFound {
                    username: username.to_string(),
                });
            }
        };

        self.attempts.check(username, now)?;

        let transformed = flip_flop_transform(password);
        let digest_value = digest(&transformed);

        // Plain comparison, not constant-time
        if digest_value != stored_digest {
            let err = self.attempts.record_failure(username, now);
            warn!("Failed login for {}: {}", username, err);
            return Err(err);
        }

        self.attempts.record_success(username);

        let token = generate_token(username, &transformed, self.token_salt(now));
        self.store.record_login(username, &token, now)?;

        info!("Login successful for {}", username);

        Ok(LoginSuccess {
            username: username.to_string(),
            transformed,
            digest: digest_value,
            token,
            timestamp: self.format_timestamp(now),
        })
    }

    /// Snapshot of every account in registration order
    pub fn list_users(&self) -> Vec<UserSummary> {
        self.store
            .iter()
            .map(|(record, history)| UserSummary {
                username: record.username().to_string(),
                transformed: record.transformed().to_string(),
                digest: record.digest().to_string(),
                last_token: record.last_token().to_string(),
                history_count: history.count(),
                history: history
                    .entries()
                    .iter()
                    .map(|entry| HistoryEntry {
                        timestamp: self.format_timestamp(entry.timestamp),
                        token: entry.token.clone(),
                    })
                    .collect(),
            })
            .collect()
    }

    fn token_salt(&self, now: DateTime<Utc>) -> Option<u64> {
        match self.token_mode {
            TokenMode::Reproducible => None,
            TokenMode::PerLogin => {
                let jitter: u64 = rand::thread_rng().gen_range(1..=999);
                Some((now.timestamp().max(0) as u64).wrapping_add(jitter))
            }
        }
    }

    fn format_timestamp(&self, timestamp: DateTime<Utc>) -> String {
        timestamp
            .with_timezone(&self.display_offset)
            .format(TIMESTAMP_FORMAT)
            .to_string()
    }

    fn validate_credentials(&self, username: &str, password: &str) -> Result<(), AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::invalid("username cannot be empty"));
        }

        if username.len() > self.max_username_length {
            return Err(AuthError::invalid(format!(
                "username longer than {} bytes",
                self.max_username_length
            )));
        }

        if username
            .chars()
            .any(|c| c.is_whitespace() || c.is_control())
        {
            return Err(AuthError::invalid(
                "username cannot contain whitespace or control characters",
            ));
        }

        if password.len() > self.max_password_length {
            return Err(AuthError::invalid(format!(
                "password longer than {} bytes",
                self.max_password_length
            )));
        }

        Ok(())
    }
}
