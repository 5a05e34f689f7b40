//! Failed-attempt tracking and timed lockout
//!
//! Each username moves through `Clear -> Accumulating(n) -> LockedOut(until)`.
//! Only users with tracked failures or an active lock hold an entry.

use chrono::{DateTime, TimeDelta, Utc};
use log::{info, warn};
use std::collections::HashMap;
use std::time::Duration;

use crate::error::AuthError;

/// Lockout thresholds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    /// Consecutive failures that trigger a lockout
    pub max_attempts: u32,
    pub lockout_duration: Duration,
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            lockout_duration: Duration::from_secs(60),
        }
    }
}

/// Per-username attempt state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Clear,
    Accumulating(u32),
    LockedOut { until: DateTime<Utc> },
}

/// Tracks consecutive failed logins per username
#[derive(Debug, Default)]
pub struct AttemptTracker {
    policy: LockoutPolicy,
    states: HashMap<String, AttemptState>,
}

impl AttemptTracker {
    pub fn new(policy: LockoutPolicy) -> Self {
        Self {
            policy,
            states: HashMap::new(),
        }
    }

    /// Current state for `username`
    pub fn state(&self, username: &str) -> AttemptState {
        self.states
            .get(username)
            .copied()
            .unwrap_or(AttemptState::Clear)
    }

    /// Gate a login attempt before the password is checked.
    ///
    /// An expired lock is cleared and the attempt proceeds. An active lock
    /// rejects the attempt without consuming any of the attempt budget.
    pub fn check(&mut self, username: &str, now: DateTime<Utc>) -> Result<(), AuthError> {
        match self.state(username) {
            AttemptState::LockedOut { until } if now < until => Err(AuthError::LockedOut {
                seconds: seconds_ceil(until - now),
            }),
            AttemptState::LockedOut { .. } => {
                self.states.remove(username);
                info!("Lockout expired for {}", username);
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// Record a wrong password and return the error to report.
    pub fn record_failure(&mut self, username: &str, now: DateTime<Utc>) -> AuthError {
        let failures = match self.state(username) {
            AttemptState::Accumulating(n) => n + 1,
            _ => 1,
        };

        if failures >= self.policy.max_attempts {
            let until = TimeDelta::from_std(self.policy.lockout_duration)
                .ok()
                .and_then(|delta| now.checked_add_signed(delta))
                .unwrap_or(DateTime::<Utc>::MAX_UTC);
            self.states
                .insert(username.to_string(), AttemptState::LockedOut { until });
            warn!(
                "Locking out {} after {} failed attempts (until {})",
                username, failures, until
            );
            AuthError::LockedOut {
                seconds: duration_secs_ceil(self.policy.lockout_duration),
            }
        } else {
            self.states
                .insert(username.to_string(), AttemptState::Accumulating(failures));
            AuthError::IncorrectPassword {
                attempts_remaining: self.policy.max_attempts - failures,
            }
        }
    }

    /// A successful login clears any tracked failures or lock.
    pub fn record_success(&mut self, username: &str) {
        self.states.remove(username);
    }
}

fn seconds_ceil(delta: TimeDelta) -> u64 {
    let millis = delta.num_milliseconds().max(0) as u64;
    millis.div_ceil(1000)
}

fn duration_secs_ceil(duration: Duration) -> u64 {
    (duration.as_millis() as u64).div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn fresh_user_is_clear() {
        let tracker = AttemptTracker::default();
        assert_eq!(tracker.state("alice"), AttemptState::Clear);
    }

    #[test]
    fn failures_accumulate_then_lock() {
        let mut tracker = AttemptTracker::default();
        let now = t0();

        assert_eq!(
            tracker.record_failure("alice", now),
            AuthError::IncorrectPassword {
                attempts_remaining: 2
            }
        );
        assert_eq!(tracker.state("alice"), AttemptState::Accumulating(1));
        assert_eq!(
            tracker.record_failure("alice", now),
            AuthError::IncorrectPassword {
                attempts_remaining: 1
            }
        );
        assert_eq!(
            tracker.record_failure("alice", now),
            AuthError::LockedOut { seconds: 60 }
        );
        assert_eq!(
            tracker.state("alice"),
            AttemptState::LockedOut {
                until: now + TimeDelta::seconds(60)
            }
        );
    }

    #[test]
    fn active_lock_rejects_and_reports_remaining() {
        let mut tracker = AttemptTracker::default();
        for _ in 0..3 {
            tracker.record_failure("alice", t0());
        }

        let later = t0() + TimeDelta::milliseconds(20_500);
        assert_eq!(
            tracker.check("alice", later),
            Err(AuthError::LockedOut { seconds: 40 })
        );
        // Rejection does not change the lock
        assert!(matches!(
            tracker.state("alice"),
            AttemptState::LockedOut { .. }
        ));
    }

    #[test]
    fn expired_lock_clears_on_check() {
        let mut tracker = AttemptTracker::default();
        for _ in 0..3 {
            tracker.record_failure("alice", t0());
        }

        assert_eq!(tracker.check("alice", t0() + TimeDelta::seconds(60)), Ok(()));
        assert_eq!(tracker.state("alice"), AttemptState::Clear);

        // Budget starts over after expiry
        assert_eq!(
            tracker.record_failure("alice", t0() + TimeDelta::seconds(61)),
            AuthError::IncorrectPassword {
                attempts_remaining: 2
            }
        );
    }

    #[test]
    fn success_resets_failures() {
        let mut tracker = AttemptTracker::default();
        tracker.record_failure("alice", t0());
        tracker.record_failure("alice", t0());
        tracker.record_success("alice");
        assert_eq!(tracker.state("alice"), AttemptState::Clear);
        assert_eq!(
            tracker.record_failure("alice", t0()),
            AuthError::IncorrectPassword {
                attempts_remaining: 2
            }
        );
    }

    #[test]
    fn users_are_tracked_independently() {
        let mut tracker = AttemptTracker::default();
        for _ in 0..3 {
            tracker.record_failure("alice", t0());
        }
        assert_eq!(tracker.check("bob", t0()), Ok(()));
        assert_eq!(tracker.state("bob"), AttemptState::Clear);
    }

    #[test]
    fn single_attempt_policy_locks_immediately() {
        let mut tracker = AttemptTracker::new(LockoutPolicy {
            max_attempts: 1,
            lockout_duration: Duration::from_secs(5),
        });
        assert_eq!(
            tracker.record_failure("alice", t0()),
            AuthError::LockedOut { seconds: 5 }
        );
    }
}
