//! Server core functionality
//!
//! This module contains the accept loop and its configuration.

pub mod config;
pub mod core;

pub use self::config::ServerConfig;
pub use self::core::Server;
