//! ftserver - Entry Point
//!
//! Usage: `ftserver <SERVER_PORT>`

use log::{error, info};
use std::env;
use std::process;
use tokio::signal;

use ftserver::error::ServerError;
use ftserver::error::handlers::{exit_code, log_server_stop};
use ftserver::protocol::parse_port;
use ftserver::{Server, ServerConfig};

#[tokio::main]
async fn main() {
    // Initialize the logger (env_logger picks up RUST_LOG, info by default)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    if args.len() != 2 {
        eprintln!("ftserver takes only one command line argument");
        eprintln!("USAGE: ftserver <SERVER_PORT>");
        process::exit(1);
    }

    let Some(port) = parse_port(args[1].trim()) else {
        eprintln!("ERROR: Invalid port number (1025 - 65535)");
        process::exit(1);
    };

    let config = match ServerConfig::load(port).map_err(ServerError::from) {
        Ok(config) => config,
        Err(e) => {
            log_server_stop(&e);
            process::exit(exit_code(&e));
        }
    };

    info!("Launching file transfer server...");

    let server = match Server::new(config).await {
        Ok(server) => server,
        Err(e) => {
            log_server_stop(&e);
            process::exit(exit_code(&e));
        }
    };

    let interrupt = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for interrupt: {}", e);
            std::future::pending::<()>().await;
        }
    };

    if let Err(e) = server.run_until(interrupt).await {
        log_server_stop(&e);
        process::exit(exit_code(&e));
    }

    info!("Server stopped");
}
