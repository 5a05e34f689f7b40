//! Account store operations

use chrono::{DateTime, Utc};
use log::{debug, info};
use std::collections::HashMap;

use crate::account::record::{AccountRecord, LoginHistory};
use crate::auth::{digest, flip_flop_transform};
use crate::error::AuthError;

struct Account {
    record: AccountRecord,
    history: LoginHistory,
}

/// Username -> account map that remembers registration order
#[derive(Default)]
pub struct AccountStore {
    accounts: HashMap<String, Account>,
    order: Vec<String>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an account with an empty login history.
    pub fn register(&mut self, username: &str, password: &str) -> Result<(), AuthError> {
        if self.accounts.contains_key(username) {
            return Err(AuthError::DuplicateUsername {
                username: username.to_string(),
            });
        }

        let transformed = flip_flop_transform(password);
        let digest = digest(&transformed);
        let record = AccountRecord::new(username.to_string(), transformed, digest);

        self.accounts.insert(
            username.to_string(),
            Account {
                record,
                history: LoginHistory::default(),
            },
        );
        self.order.push(username.to_string());

        info!("Registered account {} ({} total)", username, self.order.len());
        Ok(())
    }

    pub fn lookup(&self, username: &str) -> Option<&AccountRecord> {
        self.accounts.get(username).map(|account| &account.record)
    }

    pub fn history(&self, username: &str) -> Option<&LoginHistory> {
        self.accounts.get(username).map(|account| &account.history)
    }

    /// Stores the token as the account's latest and appends it to the history.
    ///
    /// Callers must only invoke this after the password has been verified.
    pub fn record_login(
        &mut self,
        username: &str,
        token: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let account = self
            .accounts
            .get_mut(username)
            .ok_or_else(|| AuthError::UserNotFound {
                username: username.to_string(),
            })?;

        account.record.set_last_token(token.to_string());
        account.history.push(timestamp, token.to_string());

        debug!(
            "Recorded login #{} for {}",
            account.history.count(),
            username
        );
        Ok(())
    }

    /// Accounts in registration order
    pub fn iter(&self) -> impl Iterator<Item = (&AccountRecord, &LoginHistory)> {
        self.order
            .iter()
            .filter_map(|name| self.accounts.get(name))
            .map(|account| (&account.record, &account.history))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn register_stores_transform_and_digest() {
        let mut store = AccountStore::new();
        store.register("alice", "secret").unwrap();

        let record = store.lookup("alice").unwrap();
        assert_eq!(record.username(), "alice");
        assert_eq!(record.transformed(), flip_flop_transform("secret"));
        assert_eq!(record.digest(), digest(&flip_flop_transform("secret")));
        assert_eq!(record.last_token(), "");
        assert_eq!(store.history("alice").unwrap().count(), 0);
    }

    #[test]
    fn duplicate_registration_keeps_original() {
        let mut store = AccountStore::new();
        store.register("alice", "secret").unwrap();
        let original = store.lookup("alice").unwrap().clone();

        assert_eq!(
            store.register("alice", "other"),
            Err(AuthError::DuplicateUsername {
                username: "alice".into()
            })
        );
        assert_eq!(store.lookup("alice").unwrap(), &original);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn record_login_updates_token_and_history() {
        let mut store = AccountStore::new();
        store.register("alice", "secret").unwrap();
        let first = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        let second = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();

        store.record_login("alice", "aaaaaaaaaaaa", first).unwrap();
        store.record_login("alice", "bbbbbbbbbbbb", second).unwrap();

        assert_eq!(store.lookup("alice").unwrap().last_token(), "bbbbbbbbbbbb");
        let history = store.history("alice").unwrap();
        assert_eq!(history.count(), 2);
        assert_eq!(history.entries()[0].timestamp, first);
        assert_eq!(history.entries()[0].token, "aaaaaaaaaaaa");
        assert_eq!(history.entries()[1].timestamp, second);
    }

    #[test]
    fn record_login_for_unknown_user() {
        let mut store = AccountStore::new();
        assert!(matches!(
            store.record_login("ghost", "t", Utc::now()),
            Err(AuthError::UserNotFound { .. })
        ));
    }

    #[test]
    fn iterates_in_registration_order() {
        let mut store = AccountStore::new();
        for name in ["zoe", "adam", "mia"] {
            store.register(name, "pw").unwrap();
        }
        let names: Vec<&str> = store.iter().map(|(record, _)| record.username()).collect();
        assert_eq!(names, ["zoe", "adam", "mia"]);
    }
}
