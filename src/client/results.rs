//! Client result types
//!
//! Defines the outcome of serving one control connection.

use std::fmt;
use std::io;

use crate::error::{StorageError, TransferError, ValidationError};

/// What happened to a single control request.
#[derive(Debug)]
pub enum SessionOutcome {
    /// Request failed validation; the error text went back on the control connection
    Rejected(ValidationError),
    /// The acknowledgement could not be written, nothing else was attempted
    ControlReplyFailed(io::Error),
    /// The data connection could not be opened
    ConnectFailed(TransferError),
    /// Listing frame delivered
    Listed { bytes: u64 },
    /// Served directory could not be read; the data connection was closed without a frame
    ListingUnavailable(StorageError),
    /// File frame delivered
    FileSent { filename: String, bytes: u64 },
    /// Error frame delivered for a missing or unreadable file
    FileMissing { filename: String },
    /// The data connection failed part way through a frame
    DataWriteFailed(TransferError),
}

impl SessionOutcome {
    /// True when the client received a complete data channel payload.
    pub fn delivered(&self) -> bool {
        matches!(
            self,
            SessionOutcome::Listed { .. }
                | SessionOutcome::FileSent { .. }
                | SessionOutcome::FileMissing { .. }
        )
    }
}

impl fmt::Display for SessionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionOutcome::Rejected(e) => write!(f, "rejected: {}", e),
            SessionOutcome::ControlReplyFailed(e) => write!(f, "control reply failed: {}", e),
            SessionOutcome::ConnectFailed(e) => write!(f, "data connection failed: {}", e),
            SessionOutcome::Listed { bytes } => write!(f, "directory sent ({} bytes)", bytes),
            SessionOutcome::ListingUnavailable(e) => write!(f, "listing unavailable: {}", e),
            SessionOutcome::FileSent { filename, bytes } => {
                write!(f, "file \"{}\" sent ({} bytes)", filename, bytes)
            }
            SessionOutcome::FileMissing { filename } => {
                write!(f, "file \"{}\" does not exist", filename)
            }
            SessionOutcome::DataWriteFailed(e) => write!(f, "transfer aborted: {}", e),
        }
    }
}
