//! Storage module
//!
//! Read-only access to the served directory.

pub mod operations;

pub use operations::build_listing;
