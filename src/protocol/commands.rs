//! Module `commands`
//!
//! Defines the commands a client can send and the result of executing one.

/// A command parsed from one request line.
///
/// Credential-carrying variants hold `(username, password)`.
#[derive(PartialEq)]
pub enum Command {
    REGISTER(String, String),
    LOGIN(String, String),
    USERS,
    WHOAMI,
    LOGOUT,
    QUIT,
    UNKNOWN,
}

impl Command {
    /// Command keyword, safe to log
    pub fn name(&self) -> &'static str {
        match self {
            Command::REGISTER(..) => "REGISTER",
            Command::LOGIN(..) => "LOGIN",
            Command::USERS => "USERS",
            Command::WHOAMI => "WHOAMI",
            Command::LOGOUT => "LOGOUT",
            Command::QUIT => "QUIT",
            Command::UNKNOWN => "UNKNOWN",
        }
    }

    /// Username the command acts on, if any
    pub fn username(&self) -> Option<&str> {
        match self {
            Command::REGISTER(username, _) | Command::LOGIN(username, _) => Some(username),
            _ => None,
        }
    }
}

// Passwords must never reach the logs
impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.username() {
            Some(username) => write!(f, "{}({}, <redacted>)", self.name(), username),
            None => f.write_str(self.name()),
        }
    }
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}
