//! Hostname resolution
//!
//! Turns the textual host from a control request into an IPv4 address.
//! Used both when validating a request and when dialing the data
//! connection, so a host may validate and still fail to dial later.

use std::future::Future;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use log::debug;
use tokio::net::lookup_host;

use crate::error::ResolveError;

/// Resolves hostnames to the first IPv4 address.
pub trait Resolver {
    fn resolve(&self, host: &str) -> impl Future<Output = Result<Ipv4Addr, ResolveError>> + Send;
}

/// Resolver backed by the operating system's name lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl Resolver for SystemResolver {
    async fn resolve(&self, host: &str) -> Result<Ipv4Addr, ResolveError> {
        if host.is_empty() {
            return Err(ResolveError::NotFound(String::new()));
        }

        let addrs = lookup_host((host, 0))
            .await
            .map_err(|e| ResolveError::LookupFailed(host.to_string(), e))?;

        let ip = first_ipv4(addrs).ok_or_else(|| ResolveError::NotFound(host.to_string()))?;
        debug!("Resolved {} to {}", host, ip);
        Ok(ip)
    }
}

/// First IPv4 address in resolver order. IPv6 results are skipped, never
/// used as a fallback.
fn first_ipv4(addrs: impl IntoIterator<Item = SocketAddr>) -> Option<Ipv4Addr> {
    addrs.into_iter().find_map(|addr| match addr.ip() {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(_) => None,
    })
}
