//! Module `commands`
//!
//! Data structures describing one validated control request.

use std::fmt;

/// Flag selecting the directory listing command on the wire.
pub const LIST_FLAG: &str = "-l";
/// Flag selecting the file retrieval command on the wire.
pub const GET_FLAG: &str = "-g";

/// The action a client asks the server to perform over the data connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LIST,        // List the served directory
    GET(String), // Retrieve a file by name
}

impl Command {
    /// Wire flag for this command.
    pub fn flag(&self) -> &'static str {
        match self {
            Command::LIST => LIST_FLAG,
            Command::GET(_) => GET_FLAG,
        }
    }
}

/// Parsed, validated representation of one client request.
///
/// Lives for a single request/response cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlMessage {
    pub host: String,
    pub port: u16,
    pub command: Command,
}

impl fmt::Display for ControlMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.command {
            Command::LIST => write!(f, "{} {} {}", self.host, self.port, LIST_FLAG),
            Command::GET(name) => write!(f, "{} {} {} {}", self.host, self.port, GET_FLAG, name),
        }
    }
}
