use chrono::Utc;
use log::{error, info};
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::Mutex;

use crate::client::ClientRegistry;
use crate::config::StartupConfig;
use crate::middleware::logging::{log_command, log_connection, log_disconnect};
use crate::protocol::responses;
use crate::protocol::{CommandStatus, handle_command, parse_command};
use crate::session::SessionWorkflow;

/// Serves one client connection until it quits or disconnects.
///
/// - Uses BufReader to read request lines from the client.
/// - Dispatches commands using `handle_command` while holding the workflow
///   lock, so account mutations are serialized across connections.
/// - Removes the client from the registry on exit.
pub async fn handle_client(
    stream: TcpStream,
    client_addr: SocketAddr,
    clients: Arc<Mutex<ClientRegistry>>,
    workflow: Arc<Mutex<SessionWorkflow>>,
    config: Arc<StartupConfig>,
) {
    log_connection(&client_addr);

    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);
    let mut buf = Vec::new();

    let greeting = responses::format_response(
        responses::READY,
        &serde_json::json!({ "service": env!("CARGO_PKG_NAME") }),
    );
    if let Err(e) = write_half.write_all(greeting.as_bytes()).await {
        error!("Failed to greet {}: {}", client_addr, e);
        clients.lock().await.remove(&client_addr);
        return;
    }

    loop {
        match read_request(&mut reader, &mut buf, config.max_command_length).await {
            Ok(RequestLine::Closed) => {
                // Client closed the connection
                info!("Connection closed by client {}", client_addr);
                break;
            }
            Ok(RequestLine::TooLong { terminated }) => {
                let reply = responses::protocol_error(responses::UNKNOWN_COMMAND, "CommandTooLong");
                if let Err(e) = write_half.write_all(reply.as_bytes()).await {
                    error!("Failed to reply to {}: {}", client_addr, e);
                    break;
                }
                if !terminated {
                    match discard_line(&mut reader).await {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => {
                            error!("Failed to read from {}: {}", client_addr, e);
                            break;
                        }
                    }
                }
            }
            Ok(RequestLine::Line(line)) => {
                let command = parse_command(&line);
                log_command(&client_addr, &command);

                let result = {
                    let mut clients_guard = clients.lock().await;
                    let Some(client) = clients_guard.get_mut(&client_addr) else {
                        error!("Client {} not found in registry", client_addr);
                        let reply = responses::protocol_error(
                            responses::SERVICE_UNAVAILABLE,
                            "SessionNotFound",
                        );
                        let _ = write_half.write_all(reply.as_bytes()).await;
                        break;
                    };
                    let mut workflow_guard = workflow.lock().await;
                    handle_command(client, &command, &mut workflow_guard, Utc::now())
                };

                if let Some(msg) = &result.message {
                    if let Err(e) = write_half.write_all(msg.as_bytes()).await {
                        error!("Failed to reply to {}: {}", client_addr, e);
                        break;
                    }
                }

                match result.status {
                    CommandStatus::CloseConnection => {
                        info!("Client {} requested to quit", client_addr);
                        break;
                    }
                    CommandStatus::Success => {}
                    CommandStatus::Failure(reason) => {
                        info!("{} from {} failed: {}", command.name(), client_addr, reason);
                    }
                }
            }
            Err(e) => {
                error!("Failed to read from {}: {}", client_addr, e);
                break;
            }
        }
    }

    let client = clients.lock().await.remove(&client_addr);
    log_disconnect(&client_addr, client.as_ref().and_then(|c| c.username()));
}

/// Outcome of reading one request line
#[derive(Debug, PartialEq)]
enum RequestLine {
    Line(String),
    /// The line exceeded the limit. `terminated` is false when the rest of
    /// the line is still unread.
    TooLong { terminated: bool },
    Closed,
}

/// Reads one request line, buffering at most `max_len` bytes plus one.
///
/// `max_len` counts the line terminator, like the unbounded check it
/// replaces. A final line without a newline is returned as-is.
async fn read_request<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_len: usize,
) -> io::Result<RequestLine> {
    buf.clear();
    let n = (&mut *reader)
        .take(max_len as u64 + 1)
        .read_until(b'\n', buf)
        .await?;

    if n == 0 {
        return Ok(RequestLine::Closed);
    }

    let terminated = buf.last() == Some(&b'\n');
    if n > max_len {
        return Ok(RequestLine::TooLong { terminated });
    }

    String::from_utf8(std::mem::take(buf))
        .map(RequestLine::Line)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// Skips input up to and including the next newline without buffering it.
/// Returns false if the connection closed first.
async fn discard_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> io::Result<bool> {
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(false);
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(pos) => {
                reader.consume(pos + 1);
                return Ok(true);
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}
