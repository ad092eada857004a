//! Network binding and lifecycle options.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Where the HTTP server binds and how long shutdown may take.
///
/// Every option doubles as an environment variable: `HOST` (default
/// 127.0.0.1), `PORT` (default 8080), and `SHUTDOWN_TIMEOUT` in seconds
/// (default 30). Flags win over the environment when both are given.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Address to bind. Loopback keeps the server local; 0.0.0.0 exposes
    /// it on every interface.
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on. Ports below 1024 are rejected so the server
    /// never needs elevated privileges.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Seconds to wait for in-flight requests once a shutdown signal
    /// arrives. Accepted range is 1 to 300.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

impl ServerConfig {
    /// Rejects out-of-range values before the server starts.
    ///
    /// # Errors
    ///
    /// Returns an error for privileged ports (< 1024) and for shutdown
    /// timeouts outside 1..=300 seconds.
    pub fn validate(&self) -> AnyhowResult<()> {
        if self.port < 1024 {
            return Err(anyhow!(
                "port {} is privileged; pick one in 1024-65535",
                self.port
            ));
        }

        if self.shutdown_timeout == 0 || self.shutdown_timeout > 300 {
            return Err(anyhow!(
                "shutdown timeout of {} seconds is outside 1-300",
                self.shutdown_timeout
            ));
        }

        Ok(())
    }

    /// Socket address the listener binds to.
    #[must_use]
    pub const fn server_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Shutdown grace period as a [`Duration`].
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// True when bound to the wildcard address on either IP version.
    #[must_use]
    pub const fn binds_to_all_interfaces(&self) -> bool {
        self.host.is_unspecified()
    }

    /// True for the loopback-and-default-port setup used in development.
    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self.host, IpAddr::V4(addr) if addr.is_loopback()) && self.port == 8080
    }

    /// Emits the resolved binding at startup.
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            host = %self.host,
            port = self.port,
            shutdown_timeout_secs = self.shutdown_timeout,
            development_mode = self.is_development(),
            "Server configuration"
        );
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: 8080,
            shutdown_timeout: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with(port: u16, shutdown_timeout: u64) -> ServerConfig {
        ServerConfig {
            host: default_host(),
            port,
            shutdown_timeout,
        }
    }

    #[test]
    fn defaults_validate_as_development() {
        let config = ServerConfig::default();

        assert!(config.validate().is_ok());
        assert!(config.is_development());
        assert!(!config.binds_to_all_interfaces());
        assert_eq!(config.server_addr().to_string(), "127.0.0.1:8080");
    }

    #[test]
    fn privileged_ports_are_rejected() {
        assert!(config_with(80, 30).validate().is_err());
        assert!(config_with(1023, 30).validate().is_err());
        assert!(config_with(1024, 30).validate().is_ok());
    }

    #[test]
    fn shutdown_timeout_range_is_enforced() {
        assert!(config_with(9090, 0).validate().is_err());
        assert!(config_with(9090, 301).validate().is_err());
        assert!(config_with(9090, 300).validate().is_ok());
        assert_eq!(
            config_with(9090, 45).shutdown_timeout(),
            Duration::from_secs(45)
        );
    }

    #[test]
    fn wildcard_binding_is_detected() {
        let exposed = ServerConfig {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            ..ServerConfig::default()
        };

        assert!(exposed.binds_to_all_interfaces());
        assert!(!exposed.is_development());
    }
}
