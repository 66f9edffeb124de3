use log::{error, info, warn};
use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::{TcpListener, TcpSocket};

use crate::client::handle_client;
use crate::error::ServerError;
use crate::server::config::ServerConfig;
use crate::transfer::{Resolver, SystemResolver};

/// Sequential control-connection server.
///
/// Owns the listening socket for its whole lifetime. Only one control
/// connection, and at most one data connection, is open at any time.
pub struct Server<R = SystemResolver> {
    listener: TcpListener,
    config: ServerConfig,
    resolver: R,
}

impl Server<SystemResolver> {
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        Self::with_resolver(config, SystemResolver).await
    }
}

impl<R: Resolver> Server<R> {
    /// Binds the control listener described by `config`.
    pub async fn with_resolver(config: ServerConfig, resolver: R) -> Result<Self, ServerError> {
        let control_socket = config.control_socket()?;
        let listener = bind_listener(control_socket, config.listen_backlog)?;
        info!("Server bound to {}", listener.local_addr().unwrap_or(control_socket));

        Ok(Self {
            listener,
            config,
            resolver,
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Accepts and serves clients one at a time.
    ///
    /// Returns only when a control read comes back empty or fails and
    /// `stop_on_empty_read` is set.
    pub async fn start(&self) -> Result<(), ServerError> {
        info!(
            "Serving {} on {}",
            self.config.served_directory.display(),
            self.local_addr()
                .map(|a| a.to_string())
                .unwrap_or_else(|_| "unknown".to_string())
        );

        let mut accept_failures = 0u32;
        loop {
            info!("Waiting to accept connection...");
            let (stream, client_addr) = match self.listener.accept().await {
                Ok(accepted) => {
                    accept_failures = 0;
                    accepted
                }
                Err(e) => {
                    accept_failures = accept_failures.saturating_add(1);
                    let delay = accept_backoff(accept_failures);
                    error!("{}, retrying in {:?}", ServerError::Accept(e), delay);
                    tokio::time::sleep(delay).await;
                    continue;
                }
            };
            info!("Accepted control connection from {}", client_addr);

            match handle_client(stream, client_addr, &self.config, &self.resolver).await {
                Ok(outcome) => info!("Client {}: {}", client_addr, outcome),
                Err(e) if self.config.stop_on_empty_read => return Err(e),
                Err(e) => warn!("Dropping client {}: {}", client_addr, e),
            }
        }
    }

    /// Serves until `shutdown` completes, then releases every socket.
    ///
    /// When `shutdown` wins, the in-flight session is dropped, which closes
    /// its control and data connections; the listener closes with `self`.
    pub async fn run_until<F>(self, shutdown: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.start() => result,
            _ = shutdown => {
                info!("Shutdown requested, closing open connections");
                Ok(())
            }
        }
    }
}

const ACCEPT_BACKOFF_BASE: Duration = Duration::from_millis(10);
const ACCEPT_BACKOFF_MAX: Duration = Duration::from_secs(1);

/// Pause before the next accept after `failures` consecutive errors
/// (e.g. `EMFILE`), doubling from 10ms up to one second.
fn accept_backoff(failures: u32) -> Duration {
    let shift = failures.saturating_sub(1).min(16);
    ACCEPT_BACKOFF_BASE
        .saturating_mul(1 << shift)
        .min(ACCEPT_BACKOFF_MAX)
}

fn bind_listener(addr: SocketAddr, backlog: u32) -> Result<TcpListener, ServerError> {
    let socket = if addr.is_ipv4() {
        TcpSocket::new_v4()
    } else {
        TcpSocket::new_v6()
    }
    .map_err(|e| ServerError::Bind(addr, e))?;

    socket
        .set_reuseaddr(true)
        .map_err(|e| ServerError::Bind(addr, e))?;
    socket.bind(addr).map_err(|e| ServerError::Bind(addr, e))?;
    socket.listen(backlog).map_err(|e| ServerError::Bind(addr, e))
}
