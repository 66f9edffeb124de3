//! Control protocol implementation
//!
//! Handles request parsing, validation, and reply/frame generation.

pub mod commands;
pub mod parser;
pub mod responses;

pub use commands::{Command, ControlMessage};
pub use parser::{MAX_PORT, MIN_PORT, parse_message, parse_port};
pub use responses::ListingFrame;
