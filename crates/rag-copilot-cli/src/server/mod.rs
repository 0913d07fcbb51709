//! HTTP server startup and graceful shutdown.
//!
//! The server stops on SIGINT or SIGTERM: a [`CancellationToken`] stops the
//! accept loop and in-flight requests drain for up to `SHUTDOWN_TIMEOUT`.
//!
//! [`CancellationToken`]: tokio_util::sync::CancellationToken

mod error;
mod http_server;
mod lifecycle;
mod shutdown;

use axum::Router;
pub use error::{ServerError, ServerResult};
use http_server::serve_http;
use rag_copilot_server::config::Settings;

use crate::config::ServerConfig;

/// Starts the HTTP server on `API_HOST:API_PORT`.
///
/// # Errors
///
/// Returns an error if:
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve(app: Router, settings: &Settings, config: &ServerConfig) -> ServerResult<()> {
    let address = ServerConfig::bind_address(settings);
    let all_interfaces = ServerConfig::binds_to_all_interfaces(settings);

    serve_http(app, address, config, all_interfaces).await
}
