//! Configuration Module
//!
//! Handles loading and managing daemon configuration from environment variables.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

/// Daemon configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to bind
    pub server_host: IpAddr,
    /// HTTP server port
    pub server_port: u16,
    /// Per-request deadline in seconds
    pub request_timeout: u64,
    /// Grace period in seconds for in-flight requests on shutdown
    pub shutdown_timeout: u64,
}

/// Reads and parses `name`, falling back to `default` when unset or invalid.
fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_HOST` - Bind address (default: 0.0.0.0)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `REQUEST_TIMEOUT` - Request deadline in seconds (default: 10)
    /// - `SHUTDOWN_TIMEOUT` - Shutdown grace period in seconds (default: 5)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_host: env_or("SERVER_HOST", defaults.server_host),
            server_port: env_or("SERVER_PORT", defaults.server_port),
            request_timeout: env_or("REQUEST_TIMEOUT", defaults.request_timeout),
            shutdown_timeout: env_or("SHUTDOWN_TIMEOUT", defaults.shutdown_timeout),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server_host, self.server_port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            server_port: 8080,
            request_timeout: 10,
            shutdown_timeout: 5,
        }
    }
}
