//! Session workflow
//!
//! Orchestrates transform, digest, compare-or-store, token issue and
//! lockout for the three account operations: register, login, list users.

pub mod results;
pub mod workflow;

pub use results::{HistoryEntry, LoginSuccess, UserSummary};
pub use workflow::SessionWorkflow;
