#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;
mod telemetry;

use std::process;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use rag_copilot_server::config::{Settings, SettingsLoader};
use rag_copilot_server::handler::{CustomRoutes, routes};
use rag_copilot_server::middleware::{
    CorsConfig, OpenApiConfig, RouterObservabilityExt, RouterOpenApiExt, RouterRecoveryExt,
    RouterSecurityExt,
};
use rag_copilot_server::service::{Lifecycle, ServiceState};

use crate::config::{Cli, MiddlewareConfig};

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "rag_copilot_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "rag_copilot_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "rag_copilot_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "Application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = format!("{error:#}"),
            "Application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
///
/// Settings are loaded before tracing exists, so a settings failure is
/// reported on stderr by [`main`].
async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = SettingsLoader::new()
        .with_env_file(&cli.env_file)
        .load()
        .context("failed to load settings")?;
    let settings = Arc::new(settings);

    telemetry::init_tracing(&settings)?;
    cli.log(&settings);
    cli.validate().context("invalid command-line configuration")?;

    let mut lifecycle = Lifecycle::with_default_hooks(Arc::clone(&settings));
    lifecycle
        .start()
        .await
        .context("failed to start application")?;

    let router = create_router(&settings, &cli.middleware);
    let served = server::serve(router, &settings, &cli.server).await;

    // Shutdown hooks run even when serving failed.
    let stopped = lifecycle.stop().await;

    served?;
    stopped.context("failed to stop application")?;

    Ok(())
}

/// Creates the router with all middleware layers applied.
///
/// Middleware is applied in reverse order (last added = outermost):
/// 1. Observability (outermost) - request IDs and tracing spans
/// 2. Recovery - handler errors, panics and timeouts
/// 3. Security - CORS
/// 4. Routes (innermost) - actual request handlers
fn create_router(settings: &Arc<Settings>, middleware: &MiddlewareConfig) -> Router {
    let state = ServiceState::new(Arc::clone(settings));
    let recovery = middleware.recovery.clone().with_error_details(settings.debug);

    let api_routes: Router = routes(CustomRoutes::new(), settings)
        .with_open_api(&OpenApiConfig::from_settings(settings))
        .with_state(state);

    api_routes
        .with_security(&CorsConfig::from_settings(settings))
        .with_recovery(&recovery)
        .with_observability()
}
