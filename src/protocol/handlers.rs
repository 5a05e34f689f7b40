//! Command handlers
//!
//! Dispatches parsed commands to the session workflow and renders the
//! outcome as a reply line. Connection-level login state lives on the
//! `Client`; account state lives in the workflow.

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::client::Client;
use crate::error::AuthError;
use crate::error::handlers::error_to_reply_code;
use crate::protocol::responses::{self, Okay};
use crate::protocol::{Command, CommandResult, CommandStatus};
use crate::session::SessionWorkflow;

#[derive(Serialize)]
struct SessionBody<'a> {
    username: &'a str,
    token: &'a str,
}

/// Dispatches a received command to its handler.
///
/// # Arguments
///
/// * `client` - Connection state of the client sending the command.
/// * `command` - The parsed command.
/// * `workflow` - The shared session workflow, already locked by the caller.
/// * `now` - Time of the request, used for lockout and login history.
pub fn handle_command(
    client: &mut Client,
    command: &Command,
    workflow: &mut SessionWorkflow,
    now: DateTime<Utc>,
) -> CommandResult {
    match command {
        Command::REGISTER(username, password) => handle_cmd_register(workflow, username, password),
        Command::LOGIN(username, password) => {
            handle_cmd_login(client, workflow, username, password, now)
        }
        Command::USERS => handle_cmd_users(workflow),
        Command::WHOAMI => handle_cmd_whoami(client),
        Command::LOGOUT => handle_cmd_logout(client),
        Command::QUIT => handle_cmd_quit(client),
        Command::UNKNOWN => handle_cmd_unknown(),
    }
}

fn handle_cmd_register(
    workflow: &mut SessionWorkflow,
    username: &str,
    password: &str,
) -> CommandResult {
    match workflow.register(username, password) {
        Ok(()) => CommandResult {
            status: CommandStatus::Success,
            message: Some(responses::ack(responses::OK)),
        },
        Err(e) => auth_failure(&e),
    }
}

/// Handles LOGIN: on success the connection becomes logged in as `username`.
fn handle_cmd_login(
    client: &mut Client,
    workflow: &mut SessionWorkflow,
    username: &str,
    password: &str,
    now: DateTime<Utc>,
) -> CommandResult {
    match workflow.login(username, password, now) {
        Ok(success) => {
            client.set_session(success.username.clone(), success.token.clone());
            CommandResult {
                status: CommandStatus::Success,
                message: Some(responses::format_response(
                    responses::LOGIN_SUCCESS,
                    &Okay {
                        ok: true,
                        body: &success,
                    },
                )),
            }
        }
        Err(e) => {
            // A failed attempt on the signed-in account ends that session
            if client.username() == Some(username) {
                client.logout();
            }
            auth_failure(&e)
        }
    }
}

fn handle_cmd_users(workflow: &SessionWorkflow) -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(responses::format_response(
            responses::SERVICE_INFO,
            &workflow.list_users(),
        )),
    }
}

fn handle_cmd_whoami(client: &Client) -> CommandResult {
    match (client.username(), client.token()) {
        (Some(username), Some(token)) => CommandResult {
            status: CommandStatus::Success,
            message: Some(responses::format_response(
                responses::SESSION_INFO,
                &SessionBody { username, token },
            )),
        },
        _ => not_logged_in(),
    }
}

fn handle_cmd_logout(client: &mut Client) -> CommandResult {
    if !client.is_logged_in() {
        return not_logged_in();
    }

    if let Some(username) = client.username() {
        info!("{} logged out", username);
    }
    client.logout();

    CommandResult {
        status: CommandStatus::Success,
        message: Some(responses::ack(responses::CLOSING)),
    }
}

/// Handles QUIT: logs out the client and signals connection close.
fn handle_cmd_quit(client: &mut Client) -> CommandResult {
    client.logout();

    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(responses::ack(responses::CLOSING)),
    }
}

fn handle_cmd_unknown() -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure("Unknown command".into()),
        message: Some(responses::protocol_error(
            responses::UNKNOWN_COMMAND,
            "UnknownCommand",
        )),
    }
}

fn not_logged_in() -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure("Not logged in".into()),
        message: Some(responses::protocol_error(
            responses::AUTH_FAILED,
            "NotLoggedIn",
        )),
    }
}

fn auth_failure(err: &AuthError) -> CommandResult {
    CommandResult {
        status: CommandStatus::Failure(err.to_string()),
        message: Some(responses::format_response(error_to_reply_code(err), err)),
    }
}
