//! Telemetry and tracing configuration.

mod tracing;

use anyhow::Context;
use rag_copilot_server::config::Settings;

/// Initializes the tracing subscriber from the loaded settings.
///
/// # Errors
///
/// Returns an error if the tracing subscriber fails to initialize.
pub(crate) fn init_tracing(settings: &Settings) -> anyhow::Result<()> {
    tracing::init_tracing(settings.log_level, settings.json_logs())
        .context("Failed to initialize tracing")
}
