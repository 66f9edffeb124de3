//! Error types
//!
//! Defines domain-specific error types for each module of the server.

use std::fmt;
use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::protocol::responses::{
    INVALID_COMMAND_MESSAGE, INVALID_HOSTNAME_MESSAGE, INVALID_PORT_MESSAGE,
};

/// Control message validation errors.
///
/// The `Display` text is exactly what the client receives on the control
/// connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    InvalidHostname,
    InvalidPort,
    InvalidCommand,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::InvalidHostname => f.write_str(INVALID_HOSTNAME_MESSAGE),
            ValidationError::InvalidPort => f.write_str(INVALID_PORT_MESSAGE),
            ValidationError::InvalidCommand => f.write_str(INVALID_COMMAND_MESSAGE),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Hostname resolution errors
#[derive(Debug)]
pub enum ResolveError {
    NotFound(String),
    LookupFailed(String, io::Error),
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolveError::NotFound(host) => write!(f, "No IPv4 address found for {}", host),
            ResolveError::LookupFailed(host, e) => write!(f, "Lookup of {} failed: {}", host, e),
        }
    }
}

impl std::error::Error for ResolveError {}

/// Data channel errors
#[derive(Debug)]
pub enum TransferError {
    Resolve(ResolveError),
    Connect(SocketAddr, io::Error),
    ConnectTimeout(SocketAddr),
    ShortWrite(io::Error),
    FileRead(PathBuf, io::Error),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::Resolve(e) => write!(f, "Cannot resolve data host: {}", e),
            TransferError::Connect(addr, e) => write!(f, "Failed to connect to {}: {}", addr, e),
            TransferError::ConnectTimeout(addr) => {
                write!(f, "Timeout connecting to {}", addr)
            }
            TransferError::ShortWrite(e) => write!(f, "Data connection write failed: {}", e),
            TransferError::FileRead(path, e) => {
                write!(f, "Read error on {}: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for TransferError {}

impl From<ResolveError> for TransferError {
    fn from(error: ResolveError) -> Self {
        TransferError::Resolve(error)
    }
}

/// Served directory errors
#[derive(Debug)]
pub enum StorageError {
    DirectoryUnavailable(PathBuf, io::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::DirectoryUnavailable(path, e) => {
                write!(f, "Directory {} unavailable: {}", path.display(), e)
            }
        }
    }
}

impl std::error::Error for StorageError {}

/// Server-level errors that stop the accept loop
#[derive(Debug)]
pub enum ServerError {
    Config(config::ConfigError),
    Bind(SocketAddr, io::Error),
    InvalidBindAddress(String),
    Accept(io::Error),
    EndOfInput(SocketAddr),
    ControlRead(SocketAddr, io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::Bind(addr, e) => write!(f, "Failed to bind to {}: {}", addr, e),
            ServerError::InvalidBindAddress(addr) => write!(f, "Invalid bind address: {}", addr),
            ServerError::Accept(e) => write!(f, "Error accepting connection: {}", e),
            ServerError::EndOfInput(addr) => write!(f, "Empty request from {}", addr),
            ServerError::ControlRead(addr, e) => write!(f, "Failed to read from {}: {}", addr, e),
        }
    }
}

impl std::error::Error for ServerError {}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}
