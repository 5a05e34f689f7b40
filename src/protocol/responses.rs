//! Reply codes and formatting
//!
//! Every reply is one line: a three-digit code, a space, and a JSON body.

use log::error;
use serde::Serialize;

/// Reply codes
pub const OK: u16 = 200;
pub const SERVICE_INFO: u16 = 211;
pub const SESSION_INFO: u16 = 212;
pub const READY: u16 = 220;
pub const CLOSING: u16 = 221;
pub const LOGIN_SUCCESS: u16 = 230;
pub const LOCKED_OUT: u16 = 421;
pub const TOO_MANY_CONNECTIONS: u16 = 421;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const LOCAL_ERROR: u16 = 451;
pub const UNKNOWN_COMMAND: u16 = 500;
pub const SYNTAX_ERROR: u16 = 501;
pub const AUTH_FAILED: u16 = 530;
pub const USER_NOT_FOUND: u16 = 550;
pub const DUPLICATE_USERNAME: u16 = 553;

/// Body for plain acknowledgements
#[derive(Serialize)]
pub struct Ack {
    pub ok: bool,
}

/// Wraps a success body with `"ok": true`
#[derive(Serialize)]
pub struct Okay<'a, T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub body: &'a T,
}

/// Body for protocol-level errors that are not account errors
#[derive(Serialize)]
pub struct ProtocolError<'a> {
    pub error: &'a str,
}

/// Format a reply line with a JSON body
pub fn format_response<T: Serialize + ?Sized>(code: u16, body: &T) -> String {
    match serde_json::to_string(body) {
        Ok(json) => format!("{} {}\r\n", code, json),
        Err(e) => {
            error!("Failed to encode reply body: {}", e);
            format!("{} {{\"error\":\"Internal\"}}\r\n", LOCAL_ERROR)
        }
    }
}

pub fn ack(code: u16) -> String {
    format_response(code, &Ack { ok: true })
}

pub fn protocol_error(code: u16, error: &str) -> String {
    format_response(code, &ProtocolError { error })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_code_and_json() {
        assert_eq!(ack(OK), "200 {\"ok\":true}\r\n");
        assert_eq!(
            protocol_error(UNKNOWN_COMMAND, "UnknownCommand"),
            "500 {\"error\":\"UnknownCommand\"}\r\n"
        );
    }

    #[test]
    fn session_lookup_failure_reply() {
        assert_eq!(
            protocol_error(SERVICE_UNAVAILABLE, "SessionNotFound"),
            "421 {\"error\":\"SessionNotFound\"}\r\n"
        );
    }

    #[test]
    fn control_characters_stay_on_one_line() {
        let line = format_response(OK, &vec!["a\r\nb"]);
        assert_eq!(line.matches("\r\n").count(), 1);
        assert!(line.ends_with("\r\n"));
    }
}
