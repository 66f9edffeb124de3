//! Module `file_ops`
//!
//! Streams a requested file over the data connection as
//! `"<length> "` followed by the file bytes, or sends the in-band
//! `-1` error frame when the file cannot be read.

use std::path::Path;

use log::{error, info, warn};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::TransferError;
use crate::protocol::responses::{FILE_NOT_FOUND_MESSAGE, error_frame, frame_header};
use crate::transfer::data_channel::write_all;
use crate::transfer::results::FileOutcome;

/// Default read size per chunk. Not visible on the wire.
pub const DEFAULT_CHUNK_SIZE: usize = 16 * 1024;

/// Sends `filename` (relative to `directory`) on `conn`.
///
/// The length is probed from metadata before streaming and exactly that many
/// bytes are forwarded, fewer if the file shrinks in the meantime. A missing,
/// unreadable or non-regular file produces the error frame and
/// [`FileOutcome::NotFound`].
pub async fn send_file<W>(
    conn: &mut W,
    directory: &Path,
    filename: &str,
    chunk_size: usize,
) -> Result<FileOutcome, TransferError>
where
    W: AsyncWrite + Unpin,
{
    let path = directory.join(filename);

    let opened = match File::open(&path).await {
        Ok(file) => match file.metadata().await {
            Ok(meta) if meta.is_file() => Some((file, meta.len())),
            Ok(_) => {
                warn!("Requested path {} is not a regular file", path.display());
                None
            }
            Err(e) => {
                warn!("Failed to probe length of {}: {}", path.display(), e);
                None
            }
        },
        Err(e) => {
            warn!("Failed to open file {}: {}", path.display(), e);
            None
        }
    };

    let Some((file, length)) = opened else {
        write_all(conn, &error_frame(FILE_NOT_FOUND_MESSAGE)).await?;
        finish(conn).await;
        return Ok(FileOutcome::NotFound);
    };

    info!("Starting file download: {} ({} bytes)", path.display(), length);
    write_all(conn, &frame_header(length)).await?;

    let mut remaining = file.take(length);
    let mut buffer = vec![0u8; chunk_size.max(1)];
    let mut total_bytes_sent = 0u64;

    loop {
        let n = remaining
            .read(&mut buffer)
            .await
            .map_err(|e| TransferError::FileRead(path.clone(), e))?;
        if n == 0 {
            break;
        }
        write_all(conn, &buffer[..n]).await?;
        total_bytes_sent += n as u64;
    }

    if total_bytes_sent < length {
        warn!(
            "File {} shrank during transfer: sent {} of {} bytes",
            path.display(),
            total_bytes_sent,
            length
        );
    }

    finish(conn).await;
    info!(
        "File download completed: {} ({} bytes)",
        path.display(),
        total_bytes_sent
    );

    Ok(FileOutcome::Sent {
        bytes: total_bytes_sent,
    })
}

/// Flushes and half-closes the data connection.
async fn finish<W: AsyncWrite + Unpin>(conn: &mut W) {
    if let Err(e) = conn.shutdown().await {
        error!("Failed to close data stream: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::ScratchDir;

    #[tokio::test]
    async fn sends_header_then_contents() {
        let dir = ScratchDir::new("file-ops-hello");
        std::fs::write(dir.join("report.txt"), b"hello world\n").unwrap();

        let mut out = Vec::new();
        let outcome = send_file(&mut out, &dir, "report.txt", DEFAULT_CHUNK_SIZE)
            .await
            .unwrap();

        assert_eq!(outcome, FileOutcome::Sent { bytes: 12 });
        assert_eq!(out, b"12 hello world\n");
    }

    #[tokio::test]
    async fn streams_in_small_chunks() {
        let dir = ScratchDir::new("file-ops-chunks");
        let contents: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(dir.join("blob.bin"), &contents).unwrap();

        let mut out = Vec::new();
        let outcome = send_file(&mut out, &dir, "blob.bin", 7).await.unwrap();

        assert_eq!(outcome, FileOutcome::Sent { bytes: 10_000 });
        let header = b"10000 ";
        assert_eq!(&out[..header.len()], header);
        assert_eq!(&out[header.len()..], &contents[..]);
    }

    #[tokio::test]
    async fn empty_file_is_zero_frame() {
        let dir = ScratchDir::new("file-ops-empty");
        std::fs::write(dir.join("empty"), b"").unwrap();

        let mut out = Vec::new();
        let outcome = send_file(&mut out, &dir, "empty", 16).await.unwrap();
        assert_eq!(outcome, FileOutcome::Sent { bytes: 0 });
        assert_eq!(out, b"0 ");
    }

    #[tokio::test]
    async fn missing_file_sends_error_frame() {
        let dir = ScratchDir::new("file-ops-missing");

        let mut out = Vec::new();
        let outcome = send_file(&mut out, &dir, "nope.txt", DEFAULT_CHUNK_SIZE)
            .await
            .unwrap();

        assert_eq!(outcome, FileOutcome::NotFound);
        assert_eq!(out, b"-1 21 Error: File not found");
    }

    #[tokio::test]
    async fn directory_is_not_a_file() {
        let dir = ScratchDir::new("file-ops-subdir");
        std::fs::create_dir(dir.join("inner")).unwrap();

        let mut out = Vec::new();
        let outcome = send_file(&mut out, &dir, "inner", DEFAULT_CHUNK_SIZE)
            .await
            .unwrap();

        assert_eq!(outcome, FileOutcome::NotFound);
        assert!(out.starts_with(b"-1 "));
    }
}
