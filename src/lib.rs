//! ftserver - a minimal two-connection file transfer server.
//!
//! A client sends `<host> <port> <-l | -g file>` on the control connection;
//! the server answers `OK` and dials back to `host:port` to deliver a
//! length-prefixed directory listing or file.

pub mod client;
pub mod error;
pub mod protocol;
pub mod server;
pub mod storage;
pub mod transfer;

pub use server::{Server, ServerConfig};

#[cfg(test)]
mod test_support;
