//! Middleware configuration for the HTTP server.
//!
//! CORS and documentation are driven by the application settings. Only the
//! request timeout is a process flag.
//!
//! # Example
//!
//! ```bash
//! rag-copilot --request-timeout 60
//! ```

use clap::Args;
use rag_copilot_server::config::Settings;
use rag_copilot_server::middleware::{CorsConfig, OpenApiConfig, RecoveryConfig};
use serde::{Deserialize, Serialize};

use super::validate_timeout;
use crate::TRACING_TARGET_CONFIG;

/// Middleware configuration exposed on the command line.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// Recovery middleware configuration.
    ///
    /// Controls the request timeout. Error details are disclosed based on
    /// the `DEBUG` setting, not on a flag.
    #[clap(flatten)]
    pub recovery: RecoveryConfig,
}

impl MiddlewareConfig {
    /// Validates the request timeout.
    pub fn validate(&self) -> anyhow::Result<()> {
        validate_timeout("Request", self.recovery.request_timeout)
    }

    /// Logs middleware configuration at info level.
    pub fn log(&self, settings: &Settings) {
        let cors = CorsConfig::from_settings(settings);
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            origins = ?cors.allowed_origins,
            credentials = cors.allow_credentials,
            "CORS configuration"
        );

        let openapi = OpenApiConfig::from_settings(settings);
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            enabled = openapi.enabled,
            openapi_path = %openapi.open_api_json,
            scalar_path = %openapi.scalar_ui,
            redoc_path = %openapi.redoc_ui,
            "OpenAPI configuration"
        );

        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            request_timeout_secs = self.recovery.request_timeout,
            expose_error_details = settings.debug,
            "Recovery configuration"
        );
    }
}
