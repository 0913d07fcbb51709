//! HTTP server startup with graceful shutdown.

use std::io;
use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

use super::lifecycle::{log_server_error, serve_with_shutdown};
use super::shutdown::cancel_on_signal;
use super::{ServerError, ServerResult};
use crate::config::ServerConfig;
use crate::{TRACING_TARGET_SERVER_SHUTDOWN, TRACING_TARGET_SERVER_STARTUP};

/// Binds `address` and serves `app` until a shutdown signal arrives.
///
/// # Errors
///
/// Returns an error if:
/// - Cannot bind to the specified address/port
/// - Server encounters a fatal error during operation
pub async fn serve_http(
    app: Router,
    address: String,
    config: &ServerConfig,
    all_interfaces: bool,
) -> ServerResult<()> {
    let listener = match TcpListener::bind(address.as_str()).await {
        Ok(listener) => {
            tracing::info!(
                target: TRACING_TARGET_SERVER_STARTUP,
                addr = %address,
                "Successfully bound to address"
            );

            listener
        }
        Err(listener_err) => {
            let err = ServerError::bind_error(&address, listener_err);
            log_server_error(&err);
            return Err(err);
        }
    };

    let token = CancellationToken::new();
    let signal_listener = tokio::spawn(cancel_on_signal(token.clone()));
    let drain_timeout = config.shutdown_timeout();

    let result = serve_with_shutdown(&address, all_interfaces, || {
        serve_until(listener, app, token.clone(), drain_timeout)
    })
    .await;

    token.cancel();
    signal_listener.abort();
    result
}

/// Serves `app` on `listener` until `token` is cancelled.
///
/// After cancellation no new connections are accepted and in-flight requests
/// get `drain_timeout` to complete before the server task is aborted.
pub async fn serve_until(
    listener: TcpListener,
    app: Router,
    token: CancellationToken,
    drain_timeout: Duration,
) -> io::Result<()> {
    let server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(token.clone().cancelled_owned());

    let mut server = tokio::spawn(async move { server.await });

    tokio::select! {
        result = &mut server => return result.map_err(io::Error::other)?,
        () = token.cancelled() => {}
    }

    tracing::info!(
        target: TRACING_TARGET_SERVER_SHUTDOWN,
        timeout_secs = drain_timeout.as_secs_f64(),
        "Graceful shutdown initiated, draining in-flight requests"
    );

    match tokio::time::timeout(drain_timeout, &mut server).await {
        Ok(result) => result.map_err(io::Error::other)?,
        Err(_) => {
            tracing::warn!(
                target: TRACING_TARGET_SERVER_SHUTDOWN,
                timeout_secs = drain_timeout.as_secs_f64(),
                "Shutdown timeout elapsed, aborting remaining connections"
            );
            server.abort();
            Ok(())
        }
    }
}
