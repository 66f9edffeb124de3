//! Module `data_channel`
//!
//! Opens the reverse data connection. The client listens on the port named
//! in its request and the server connects out to it, so every request that
//! passes validation ends with a fresh outbound TCP connection.

use std::net::SocketAddr;
use std::time::Duration;

use log::{error, info};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use crate::error::TransferError;
use crate::transfer::Resolver;

/// Connects to the client's data listener at `host:port`.
///
/// The host is resolved again here even though validation already resolved
/// it. `connect_timeout` of `None` waits as long as the OS does.
pub async fn dial<R: Resolver>(
    resolver: &R,
    host: &str,
    port: u16,
    connect_timeout: Option<Duration>,
) -> Result<TcpStream, TransferError> {
    let ip = resolver.resolve(host).await?;
    let data_socket = SocketAddr::from((ip, port));

    info!("Connecting to data socket {} for {}", data_socket, host);

    let connect = TcpStream::connect(data_socket);
    let result = match connect_timeout {
        Some(limit) => timeout(limit, connect)
            .await
            .map_err(|_| TransferError::ConnectTimeout(data_socket))?,
        None => connect.await,
    };

    match result {
        Ok(stream) => {
            info!("Data connection established with {}", data_socket);
            Ok(stream)
        }
        Err(e) => {
            error!("Failed to connect to data socket {}: {}", data_socket, e);
            Err(TransferError::Connect(data_socket, e))
        }
    }
}

/// Writes the whole buffer or fails.
///
/// A single socket write may accept only part of the buffer under
/// backpressure; this keeps writing until everything is sent.
pub async fn write_all<W>(conn: &mut W, bytes: &[u8]) -> Result<(), TransferError>
where
    W: AsyncWrite + Unpin,
{
    conn.write_all(bytes)
        .await
        .map_err(TransferError::ShortWrite)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transfer::SystemResolver;
    use std::io;
    use std::pin::Pin;
    use std::task::{Context, Poll};
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    /// Accepts at most `limit` bytes per write call.
    struct Trickle {
        limit: usize,
        written: Vec<u8>,
        calls: usize,
    }

    impl AsyncWrite for Trickle {
        fn poll_write(
            mut self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            let n = buf.len().min(self.limit);
            self.written.extend_from_slice(&buf[..n]);
            self.calls += 1;
            Poll::Ready(Ok(n))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    /// Accepts nothing.
    struct Closed;

    impl AsyncWrite for Closed {
        fn poll_write(
            self: Pin<&mut Self>,
            _cx: &mut Context<'_>,
            _buf: &[u8],
        ) -> Poll<io::Result<usize>> {
            Poll::Ready(Ok(0))
        }

        fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }

        fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
            Poll::Ready(Ok(()))
        }
    }

    #[tokio::test]
    async fn write_all_survives_partial_writes() {
        let mut conn = Trickle {
            limit: 3,
            written: Vec::new(),
            calls: 0,
        };
        write_all(&mut conn, b"hello world").await.unwrap();
        assert_eq!(conn.written, b"hello world");
        assert_eq!(conn.calls, 4);
    }

    #[tokio::test]
    async fn write_all_reports_short_write() {
        let result = write_all(&mut Closed, b"data").await;
        assert!(matches!(result, Err(TransferError::ShortWrite(_))));
    }

    #[tokio::test]
    async fn dial_reaches_listening_client() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut conn = dial(&SystemResolver, "127.0.0.1", port, None).await.unwrap();
        let (mut accepted, _) = listener.accept().await.unwrap();

        write_all(&mut conn, b"ping").await.unwrap();
        drop(conn);

        let mut received = Vec::new();
        accepted.read_to_end(&mut received).await.unwrap();
        assert_eq!(received, b"ping");
    }

    #[tokio::test]
    async fn dial_refused_is_connect_error() {
        // Bind then drop to find a port nobody listens on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let result = dial(
            &SystemResolver,
            "127.0.0.1",
            port,
            Some(Duration::from_secs(5)),
        )
        .await;
        assert!(matches!(result, Err(TransferError::Connect(..))));
    }
}
