//! Server lifecycle management.
//!
//! Wraps the serve future with startup warnings, uptime tracking and
//! operator-facing error reporting.

use std::future::Future;
use std::io;
use std::time::Instant;

use super::{ServerError, ServerResult};
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Serves with lifecycle management.
///
/// # Arguments
///
/// * `address` - The address the server is bound to
/// * `all_interfaces` - Whether the address is a wildcard address
/// * `serve_fn` - Function that returns the server future
///
/// # Errors
///
/// Returns [`ServerError::Runtime`] if the server future fails.
pub async fn serve_with_shutdown<F>(
    address: &str,
    all_interfaces: bool,
    serve_fn: impl FnOnce() -> F,
) -> ServerResult<()>
where
    F: Future<Output = io::Result<()>>,
{
    let start_time = Instant::now();

    tracing::info!(
        target: TRACING_TARGET_SERVER_STARTUP,
        addr = %address,
        "Server is ready and listening for connections"
    );

    if all_interfaces {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            "Server bound to all interfaces - ensure firewall is configured"
        );
    }

    let result = serve_fn().await.map_err(ServerError::Runtime);

    handle_result(result, start_time)
}

/// Handles the server result and logs appropriate messages.
fn handle_result(result: ServerResult<()>, start_time: Instant) -> ServerResult<()> {
    let uptime = start_time.elapsed();

    match result {
        Ok(()) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs = uptime.as_secs(),
                "Server shut down gracefully"
            );
            Ok(())
        }
        Err(err) => {
            log_server_error(&err);
            tracing::error!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                uptime_secs = uptime.as_secs(),
                "Server stopped after a fatal error"
            );
            Err(err)
        }
    }
}

/// Logs a server error with its code and recovery suggestion.
pub fn log_server_error(err: &ServerError) {
    tracing::error!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        error = %err,
        context = ?err.context(),
        "Fatal error"
    );

    if let Some(suggestion) = err.suggestion() {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            suggestion = suggestion,
            "Recovery suggestion"
        );
    }
}
