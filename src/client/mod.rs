//! Client request handling
//!
//! Serves a single control connection and reports what happened.

pub mod handler;
pub mod results;

pub use handler::handle_client;
pub use results::SessionOutcome;
