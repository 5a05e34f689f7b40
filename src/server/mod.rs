//! Server core functionality
//!
//! Owns the listener, the shared session workflow and the client registry.

pub mod core;

pub use core::Server;
