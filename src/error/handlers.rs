//! Error handlers
//!
//! Operator-facing reporting of errors that do not reach the client.

use crate::error::types::{ServerError, StorageError, TransferError};
use log::{error, warn};

/// Log a failed data channel operation for the given request target
pub fn log_transfer_error(host: &str, port: u16, err: &TransferError) {
    error!("Data connection to {}:{} failed: {}", host, port, err);
}

/// Log a listing that could not be produced
pub fn log_storage_error(host: &str, port: u16, err: &StorageError) {
    error!(
        "ERROR: Failed to send directory to {} on port {}: {}",
        host, port, err
    );
}

/// Log the reason the accept loop stopped
pub fn log_server_stop(err: &ServerError) {
    match err {
        ServerError::EndOfInput(_) | ServerError::ControlRead(..) => {
            warn!("Stopping server: {}", err)
        }
        _ => error!("Server error: {}", err),
    }
}

/// Process exit status for a server error
pub fn exit_code(err: &ServerError) -> i32 {
    match err {
        ServerError::EndOfInput(_) | ServerError::ControlRead(..) => 0,
        ServerError::Config(_) | ServerError::InvalidBindAddress(_) => 2,
        ServerError::Bind(..) | ServerError::Accept(_) => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::SocketAddr;

    #[test]
    fn end_of_input_exits_cleanly() {
        let addr: SocketAddr = "127.0.0.1:4000".parse().unwrap();
        assert_eq!(exit_code(&ServerError::EndOfInput(addr)), 0);
        assert_eq!(
            exit_code(&ServerError::InvalidBindAddress("nowhere".into())),
            2
        );
    }
}
