//! Logging middleware
//!
//! Connection and request logging. Commands are logged by keyword and
//! username only; passwords never reach the log.

use log::{debug, info};
use std::net::SocketAddr;

use crate::protocol::Command;

/// Log a client connection
pub fn log_connection(client_addr: &SocketAddr) {
    info!("Client connected: {}", client_addr);
}

/// Log a client command
pub fn log_command(client_addr: &SocketAddr, command: &Command) {
    match command.username() {
        Some(username) => info!("Client {} sent {} for {}", client_addr, command.name(), username),
        None => debug!("Client {} sent {}", client_addr, command.name()),
    }
}

/// Log a client disconnect along with the account it was logged in as
pub fn log_disconnect(client_addr: &SocketAddr, username: Option<&str>) {
    match username {
        Some(username) => info!("Client {} ({}) disconnected", client_addr, username),
        None => info!("Client {} disconnected", client_addr),
    }
}
