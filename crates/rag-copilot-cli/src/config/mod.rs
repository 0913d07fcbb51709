//! CLI configuration management.
//!
//! This module defines the process-level configuration:
//!
//! ```text
//! Cli
//! ├── env_file: PathBuf            # Dotenv file with application settings
//! ├── server: ServerConfig         # Graceful shutdown
//! └── middleware: MiddlewareConfig # Request timeout
//! ```
//!
//! Application settings (host, port, CORS, logging, ...) are not flags: they
//! are read by [`SettingsLoader`] from the environment and the dotenv file.
//!
//! # Example
//!
//! ```bash
//! rag-copilot --env-file deploy/staging.env --shutdown-timeout 10
//!
//! # Or via environment variables
//! ENV_FILE=deploy/staging.env SHUTDOWN_TIMEOUT=10 rag-copilot
//! ```
//!
//! [`SettingsLoader`]: rag_copilot_server::config::SettingsLoader

mod middleware;
mod server;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
pub use middleware::MiddlewareConfig;
use rag_copilot_server::config::{DEFAULT_ENV_FILE, Settings};
use serde::{Deserialize, Serialize};
pub use server::{ServerConfig, validate_timeout};

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_SERVER_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser, Serialize, Deserialize)]
#[command(name = "rag-copilot")]
#[command(about = "Private RAG Copilot server")]
#[command(version)]
pub struct Cli {
    /// Dotenv file with application settings.
    ///
    /// A missing file is ignored. Variables set in the process environment
    /// take precedence over the ones in the file.
    #[arg(long, env = "ENV_FILE", default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Server lifecycle configuration.
    #[clap(flatten)]
    pub server: ServerConfig,

    /// HTTP middleware configuration (timeouts).
    #[clap(flatten)]
    pub middleware: MiddlewareConfig,
}

impl Cli {
    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .validate()
            .context("invalid server configuration")?;
        self.middleware
            .validate()
            .context("invalid middleware configuration")?;
        Ok(())
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_SERVER_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            "Build information"
        );
    }

    /// Logs configuration (no sensitive information).
    pub fn log(&self, settings: &Settings) {
        Self::log_build_info();

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            env_file = %self.env_file.display(),
            settings = %settings,
            log_level = %settings.log_level,
            json_logs = settings.json_logs(),
            "Settings loaded"
        );

        self.server.log(settings);
        self.middleware.log(settings);
    }
}
