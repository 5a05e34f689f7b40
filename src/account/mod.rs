//! Account store
//!
//! In-memory registry of accounts and their login history. Nothing is
//! persisted: the store lives exactly as long as the process.

pub mod record;
pub mod store;

pub use record::{AccountRecord, LoginEntry, LoginHistory};
pub use store::AccountStore;
