//! Line protocol
//!
//! Handles command parsing, dispatch to the session workflow, and reply
//! formatting.

pub mod commands;
pub mod handlers;
pub mod parser;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus};
pub use handlers::handle_command;
pub use parser::parse_command;
