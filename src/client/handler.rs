use log::{error, info, warn};
use std::net::SocketAddr;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::client::results::SessionOutcome;
use crate::error::ServerError;
use crate::error::handlers::{log_storage_error, log_transfer_error};
use crate::protocol::responses::{OK_REPLY, error_reply};
use crate::protocol::{Command, ControlMessage, parse_message};
use crate::server::config::ServerConfig;
use crate::storage::build_listing;
use crate::transfer::{FileOutcome, Resolver, dial, send_file, write_all};

/// Serves one control connection from request to closed data connection.
///
/// - Reads a single request of at most `max_request_len` bytes.
/// - Replies `OK` or the fixed-size rejection before touching the data channel.
/// - Dials the client back and runs the listing or file responder.
///
/// An empty or failed read is returned as an error so the accept loop can
/// decide whether to stop.
pub async fn handle_client<S, R>(
    mut cmd_stream: S,
    client_addr: SocketAddr,
    config: &ServerConfig,
    resolver: &R,
) -> Result<SessionOutcome, ServerError>
where
    S: AsyncRead + AsyncWrite + Unpin,
    R: Resolver,
{
    let mut buffer = vec![0u8; config.max_request_len];
    let n = match cmd_stream.read(&mut buffer).await {
        Ok(0) => return Err(ServerError::EndOfInput(client_addr)),
        Ok(n) => n,
        Err(e) => return Err(ServerError::ControlRead(client_addr, e)),
    };

    let raw = String::from_utf8_lossy(&buffer[..n]);
    info!("Received from {}: {:?}", client_addr, raw.trim_end());

    let message = match parse_message(&raw, resolver).await {
        Ok(message) => message,
        Err(e) => {
            error!("ERROR: {}", e);
            let reply = error_reply(&e.to_string(), config.error_reply_len);
            if let Err(write_err) = cmd_stream.write_all(&reply).await {
                warn!("Failed to send rejection to {}: {}", client_addr, write_err);
            }
            return Ok(SessionOutcome::Rejected(e));
        }
    };

    if let Err(e) = cmd_stream.write_all(OK_REPLY).await {
        warn!("Failed to acknowledge {}: {}", client_addr, e);
        return Ok(SessionOutcome::ControlReplyFailed(e));
    }

    Ok(dispatch(&message, config, resolver).await)
}

/// Opens the data connection and runs the responder for the command.
async fn dispatch<R: Resolver>(
    message: &ControlMessage,
    config: &ServerConfig,
    resolver: &R,
) -> SessionOutcome {
    let host = message.host.as_str();
    let port = message.port;
    info!("Dispatching {} for {} on port {}", message.command.flag(), host, port);

    let mut data_stream = match dial(resolver, host, port, config.connect_timeout()).await {
        Ok(stream) => stream,
        Err(e) => {
            log_transfer_error(host, port, &e);
            return SessionOutcome::ConnectFailed(e);
        }
    };

    match &message.command {
        Command::LIST => {
            let frame = match build_listing(&config.served_directory).await {
                Ok(frame) => frame,
                Err(e) => {
                    log_storage_error(host, port, &e);
                    return SessionOutcome::ListingUnavailable(e);
                }
            };

            if let Err(e) = write_all(&mut data_stream, &frame.to_bytes()).await {
                log_transfer_error(host, port, &e);
                return SessionOutcome::DataWriteFailed(e);
            }
            if let Err(e) = data_stream.shutdown().await {
                warn!("Failed to close data stream to {}:{}: {}", host, port, e);
            }

            info!("Sending directory to {} on port {}", host, port);
            SessionOutcome::Listed {
                bytes: frame.declared_len(),
            }
        }
        Command::GET(filename) => {
            match send_file(
                &mut data_stream,
                &config.served_directory,
                filename,
                config.chunk_size,
            )
            .await
            {
                Ok(FileOutcome::Sent { bytes }) => {
                    info!(
                        "Sending file \"{}\" to {} on port {}",
                        filename, host, port
                    );
                    SessionOutcome::FileSent {
                        filename: filename.clone(),
                        bytes,
                    }
                }
                Ok(FileOutcome::NotFound) => {
                    error!(
                        "ERROR: File \"{}\" request by {} on port {} does not exist",
                        filename, host, port
                    );
                    SessionOutcome::FileMissing {
                        filename: filename.clone(),
                    }
                }
                Err(e) => {
                    log_transfer_error(host, port, &e);
                    SessionOutcome::DataWriteFailed(e)
                }
            }
        }
    }
}
