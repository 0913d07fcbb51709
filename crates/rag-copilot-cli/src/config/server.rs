//! HTTP server configuration.

use std::net::IpAddr;
use std::time::Duration;

use anyhow::{Result as AnyhowResult, anyhow};
use clap::Args;
use rag_copilot_server::config::Settings;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Upper bound for every timeout flag, in seconds.
const MAX_TIMEOUT_SECS: u64 = 300;

/// HTTP server lifecycle configuration.
///
/// The bind address is not part of this struct: it comes from the
/// `API_HOST` and `API_PORT` settings.
///
/// # Environment Variables
///
/// - `SHUTDOWN_TIMEOUT` - Graceful shutdown timeout in seconds (default: 30, max: 300)
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct ServerConfig {
    /// Maximum time in seconds to wait for graceful shutdown.
    ///
    /// During shutdown, the server will stop accepting new connections and wait
    /// up to this duration for existing requests to complete before it stops
    /// waiting. Valid range: 1-300 seconds.
    #[arg(long, env = "SHUTDOWN_TIMEOUT", default_value_t = 30)]
    pub shutdown_timeout: u64,
}

impl ServerConfig {
    /// Validates all configuration values and returns errors for invalid settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the shutdown timeout is outside 1-300 seconds.
    pub fn validate(&self) -> AnyhowResult<()> {
        validate_timeout("Shutdown", self.shutdown_timeout)
    }

    /// Returns the graceful shutdown timeout as a `Duration`.
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout)
    }

    /// Returns the `host:port` address the server binds to.
    #[must_use]
    pub fn bind_address(settings: &Settings) -> String {
        match settings.api_host.parse::<IpAddr>() {
            Ok(IpAddr::V6(addr)) => format!("[{addr}]:{}", settings.api_port),
            _ => format!("{}:{}", settings.api_host, settings.api_port),
        }
    }

    /// Returns whether the server is configured to bind to all interfaces.
    ///
    /// This is true when the host is set to "0.0.0.0" (IPv4) or "::" (IPv6).
    #[must_use]
    pub fn binds_to_all_interfaces(settings: &Settings) -> bool {
        settings
            .api_host
            .parse::<IpAddr>()
            .is_ok_and(|addr| addr.is_unspecified())
    }

    /// Logs server configuration at info level.
    pub fn log(&self, settings: &Settings) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            addr = %Self::bind_address(settings),
            shutdown_timeout_secs = self.shutdown_timeout,
            binds_to_all_interfaces = Self::binds_to_all_interfaces(settings),
            "Server configuration"
        );
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            shutdown_timeout: 30,
        }
    }
}

/// Checks that a timeout is within 1-300 seconds.
pub fn validate_timeout(name: &str, secs: u64) -> AnyhowResult<()> {
    if secs == 0 || secs > MAX_TIMEOUT_SECS {
        return Err(anyhow!(
            "{name} timeout {secs} seconds is invalid. Must be between 1 and {MAX_TIMEOUT_SECS} seconds."
        ));
    }

    Ok(())
}
