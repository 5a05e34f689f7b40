//! Command parsing
//!
//! Turns a raw request line into a `Command`.

use crate::protocol::Command;

/// Parses a raw request line.
///
/// Keywords are case-insensitive. For `REGISTER` and `LOGIN` the password is
/// the rest of the line after the username, so it may contain spaces.
/// Missing arguments yield `UNKNOWN`.
pub fn parse_command(raw: &str) -> Command {
    let trimmed = raw.trim();
    let mut parts = trimmed.splitn(2, char::is_whitespace);
    let cmd = parts.next().unwrap_or("").to_ascii_uppercase();
    let args = parts.next().unwrap_or("").trim();

    match cmd.as_str() {
        "REGISTER" => credentials(args).map_or(Command::UNKNOWN, |(u, p)| Command::REGISTER(u, p)),
        "LOGIN" => credentials(args).map_or(Command::UNKNOWN, |(u, p)| Command::LOGIN(u, p)),
        "USERS" if args.is_empty() => Command::USERS,
        "WHOAMI" if args.is_empty() => Command::WHOAMI,
        "LOGOUT" if args.is_empty() => Command::LOGOUT,
        "QUIT" | "Q" => Command::QUIT,
        _ => Command::UNKNOWN,
    }
}

fn credentials(args: &str) -> Option<(String, String)> {
    let mut parts = args.splitn(2, char::is_whitespace);
    let username = parts.next().filter(|u| !u.is_empty())?;
    let password = parts.next().map(str::trim).filter(|p| !p.is_empty())?;
    Some((username.to_string(), password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_credentials() {
        assert_eq!(
            parse_command("REGISTER alice secret\r\n"),
            Command::REGISTER("alice".into(), "secret".into())
        );
        assert_eq!(
            parse_command("login bob  correct horse "),
            Command::LOGIN("bob".into(), "correct horse".into())
        );
    }

    #[test]
    fn missing_arguments_are_unknown() {
        assert_eq!(parse_command("REGISTER"), Command::UNKNOWN);
        assert_eq!(parse_command("LOGIN alice"), Command::UNKNOWN);
        assert_eq!(parse_command("LOGIN alice   "), Command::UNKNOWN);
    }

    #[test]
    fn simple_commands() {
        assert_eq!(parse_command("users"), Command::USERS);
        assert_eq!(parse_command("WHOAMI"), Command::WHOAMI);
        assert_eq!(parse_command("LOGOUT"), Command::LOGOUT);
        assert_eq!(parse_command("q"), Command::QUIT);
        assert_eq!(parse_command("USERS extra"), Command::UNKNOWN);
        assert_eq!(parse_command(""), Command::UNKNOWN);
        assert_eq!(parse_command("RETR file.txt"), Command::UNKNOWN);
    }

    #[test]
    fn debug_output_hides_password() {
        let rendered = format!("{:?}", parse_command("LOGIN alice secret"));
        assert_eq!(rendered, "LOGIN(alice, <redacted>)");
    }
}
