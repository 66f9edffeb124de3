//! Storage operations
//!
//! Enumerates the served directory for the listing command.

use log::{error, info};
use std::path::Path;
use tokio::fs;

use crate::error::StorageError;
use crate::protocol::ListingFrame;

/// Entries every directory stream starts with; `read_dir` skips them.
const DOT_ENTRIES: [&[u8]; 2] = [b".", b".."];

/// Builds the listing frame for `directory`.
///
/// `.` and `..` come first, then entries in the order the filesystem yields
/// them; nothing is sorted or filtered.
pub async fn build_listing(directory: &Path) -> Result<ListingFrame, StorageError> {
    let mut entries = fs::read_dir(directory).await.map_err(|e| {
        error!("Failed to open directory {}: {}", directory.display(), e);
        StorageError::DirectoryUnavailable(directory.to_path_buf(), e)
    })?;

    let mut frame = ListingFrame::new();
    for name in DOT_ENTRIES {
        frame.push_entry(name);
    }
    let mut count = DOT_ENTRIES.len();

    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| StorageError::DirectoryUnavailable(directory.to_path_buf(), e))?
    {
        frame.push_entry(entry.file_name().as_encoded_bytes());
        count += 1;
    }

    info!(
        "Listed directory {} - {} entries, {} bytes",
        directory.display(),
        count,
        frame.declared_len()
    );

    Ok(frame)
}
