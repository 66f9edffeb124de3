//! Server configuration
//!
//! Layered settings: built-in defaults, then an optional `ftserver.toml`
//! in the working directory, then `FTSERVER_*` environment variables, and
//! finally the listening port given on the command line.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::ServerError;
use crate::protocol::responses::{
    INVALID_COMMAND_MESSAGE, INVALID_HOSTNAME_MESSAGE, INVALID_PORT_MESSAGE,
};
use crate::protocol::{MAX_PORT, MIN_PORT};
use crate::transfer::DEFAULT_CHUNK_SIZE;

const CONFIG_FILE: &str = "ftserver";
const ENV_PREFIX: &str = "FTSERVER";

/// Server configuration structure
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ServerConfig {
    /// IP address the control listener binds to
    pub bind_address: String,

    /// Port for the control connection
    pub control_port: u16,

    /// Directory that is listed and served
    pub served_directory: PathBuf,

    /// Upper bound of a single control request read
    pub max_request_len: usize,

    /// Size of the rejection reply on the control connection
    pub error_reply_len: usize,

    /// Read size for file streaming
    pub chunk_size: usize,

    /// Data connection timeout, 0 disables it
    pub connect_timeout_secs: u64,

    /// Pending connection queue for the control listener
    pub listen_backlog: u32,

    /// Stop the whole server when a control read returns nothing
    pub stop_on_empty_read: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            control_port: 30021,
            served_directory: PathBuf::from("."),
            max_request_len: 500,
            error_reply_len: 100,
            chunk_size: DEFAULT_CHUNK_SIZE,
            connect_timeout_secs: 0,
            listen_backlog: 5,
            stop_on_empty_read: true,
        }
    }
}

impl ServerConfig {
    /// Load configuration for the given control port.
    pub fn load(control_port: u16) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address.as_str())?
            .set_default(
                "served_directory",
                defaults.served_directory.to_string_lossy().into_owned(),
            )?
            .set_default("max_request_len", defaults.max_request_len as i64)?
            .set_default("error_reply_len", defaults.error_reply_len as i64)?
            .set_default("chunk_size", defaults.chunk_size as i64)?
            .set_default("connect_timeout_secs", defaults.connect_timeout_secs as i64)?
            .set_default("listen_backlog", defaults.listen_backlog as i64)?
            .set_default("stop_on_empty_read", defaults.stop_on_empty_read)?
            .add_source(File::with_name(CONFIG_FILE).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .set_override("control_port", control_port as i64)?
            .build()?;

        let config: ServerConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults with the given control port, no file or environment lookup.
    pub fn with_port(control_port: u16) -> Self {
        Self {
            control_port,
            ..Self::default()
        }
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PORT..=MAX_PORT).contains(&self.control_port) {
            return Err(ConfigError::Message(format!(
                "control_port must be between {} and {}",
                MIN_PORT, MAX_PORT
            )));
        }

        if self.bind_address.parse::<IpAddr>().is_err() {
            return Err(ConfigError::Message(format!(
                "bind_address is not an IP address: {}",
                self.bind_address
            )));
        }

        if self.max_request_len == 0 {
            return Err(ConfigError::Message(
                "max_request_len must be greater than 0".into(),
            ));
        }

        if self.chunk_size == 0 {
            return Err(ConfigError::Message(
                "chunk_size must be greater than 0".into(),
            ));
        }

        let longest_error = [
            INVALID_HOSTNAME_MESSAGE,
            INVALID_PORT_MESSAGE,
            INVALID_COMMAND_MESSAGE,
        ]
        .iter()
        .map(|m| m.len())
        .max()
        .unwrap_or(0);
        if self.error_reply_len < longest_error {
            return Err(ConfigError::Message(format!(
                "error_reply_len must be at least {}",
                longest_error
            )));
        }

        Ok(())
    }

    /// Socket address for the control listener
    pub fn control_socket(&self) -> Result<SocketAddr, ServerError> {
        self.bind_address
            .parse::<IpAddr>()
            .map(|ip| SocketAddr::new(ip, self.control_port))
            .map_err(|_| ServerError::InvalidBindAddress(self.bind_address.clone()))
    }

    /// Data connection timeout, if one is configured
    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout_secs > 0).then(|| Duration::from_secs(self.connect_timeout_secs))
    }
}
