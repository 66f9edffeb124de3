//! Control message parsing
//!
//! Validates one control request of the form
//! `<hostname> <port> <command> [<filename>]` and builds a
//! [`ControlMessage`]. Checks run in a fixed order and the first failure
//! is reported.

use crate::error::ValidationError;
use crate::protocol::commands::{Command, ControlMessage, GET_FLAG, LIST_FLAG};
use crate::transfer::Resolver;

/// Lowest data or listening port a client may name.
pub const MIN_PORT: u16 = 1025;
/// Highest valid port.
pub const MAX_PORT: u16 = 65535;

/// Parses and validates a raw control request.
///
/// The input is only borrowed. Trailing CR/LF is ignored, runs of spaces
/// separate tokens, and tokens after the filename are ignored.
pub async fn parse_message<R: Resolver>(
    raw: &str,
    resolver: &R,
) -> Result<ControlMessage, ValidationError> {
    let line = raw.trim_end_matches(['\r', '\n', '\0']);
    let mut tokens = line.split(' ').filter(|t| !t.is_empty());

    let host = tokens.next().unwrap_or("");
    if resolver.resolve(host).await.is_err() {
        return Err(ValidationError::InvalidHostname);
    }

    let port = tokens
        .next()
        .and_then(parse_port)
        .ok_or(ValidationError::InvalidPort)?;

    let command = match (tokens.next(), tokens.next()) {
        (Some(LIST_FLAG), _) => Command::LIST,
        (Some(GET_FLAG), Some(filename)) => Command::GET(filename.to_string()),
        _ => return Err(ValidationError::InvalidCommand),
    };

    Ok(ControlMessage {
        host: host.to_string(),
        port,
        command,
    })
}

/// Parses a port made only of ASCII digits within [`MIN_PORT`, `MAX_PORT`].
pub fn parse_port(raw: &str) -> Option<u16> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // Overlong digit strings fail to parse and are rejected with the rest.
    let port: u32 = raw.parse().ok()?;
    if (MIN_PORT as u32..=MAX_PORT as u32).contains(&port) {
        Some(port as u16)
    } else {
        None
    }
}
