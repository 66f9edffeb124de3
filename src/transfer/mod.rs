//! Transfer module
//!
//! Handles hostname resolution, the reverse data connection, and file
//! streaming over it.

pub mod data_channel;
pub mod file_ops;
pub mod resolver;
pub mod results;

// Re-export key types and functions
pub use data_channel::{dial, write_all};
pub use file_ops::{DEFAULT_CHUNK_SIZE, send_file};
pub use resolver::{Resolver, SystemResolver};
pub use results::FileOutcome;
