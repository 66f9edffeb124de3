//! Transfer result types
//!
//! Defines result values returned by data channel responders.

/// Outcome of a file request on the data connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Sent { bytes: u64 },
    NotFound,
}
