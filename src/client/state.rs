//! Module `state`
//!
//! Defines the `Client` struct tracking which account, if any, a connection
//! is currently logged in as.

/// Connection-level state of a connected client.
#[derive(Debug, Default)]
pub struct Client {
    username: Option<String>,
    token: Option<String>,
}

impl Client {
    /// Marks the connection as logged in with the token just issued.
    pub fn set_session(&mut self, username: String, token: String) {
        self.username = Some(username);
        self.token = Some(token);
    }

    /// Clears the connection's login. Account state is untouched.
    pub fn logout(&mut self) {
        self.username = None;
        self.token = None;
    }

    pub fn is_logged_in(&self) -> bool {
        self.username.is_some()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}
