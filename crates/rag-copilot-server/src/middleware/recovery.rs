//! Recovery middleware for handling errors, panics, and timeouts.
//!
//! Handler errors, panics and timeouts all end up as a `500` response with the
//! generic [`ErrorResponse`] body. The detail text is always logged and is
//! only written to the body when error details are exposed (debug mode).
//!
//! [`ErrorResponse`]: crate::handler::ErrorResponse

use std::any::Any;
use std::future::ready;
use std::time::Duration;

use axum::Router;
use axum::error_handling::HandleErrorLayer;
use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::{Next, from_fn_with_state};
use axum::response::{IntoResponse, Response};
#[cfg(feature = "cli")]
use clap::Args;
use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use tower::ServiceBuilder;
use tower::timeout::TimeoutLayer;
use tower_http::catch_panic::CatchPanicLayer;

use crate::handler::{ErrorDetail, ErrorKind};
use crate::utility::tracing_targets::{
    TRACING_TARGET_RECOVERY_ERROR, TRACING_TARGET_RECOVERY_PANIC,
};

type ResponseFut = BoxFuture<'static, Response>;
type Panic = Box<dyn Any + Send + 'static>;

/// Configuration for recovery middleware behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct RecoveryConfig {
    /// Maximum duration in seconds to wait for a request to complete before timing out.
    /// Requests exceeding this duration receive a 500 response.
    #[cfg_attr(
        feature = "cli",
        arg(
            long,
            env = "REQUEST_TIMEOUT",
            default_value = "30",
            value_parser = clap::value_parser!(u64).range(1..=300)
        )
    )]
    pub request_timeout: u64,

    /// Whether 500 responses carry the real error text instead of the generic message.
    #[cfg_attr(feature = "cli", arg(skip))]
    #[serde(default)]
    pub expose_error_details: bool,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            request_timeout: 30,
            expose_error_details: false,
        }
    }
}

impl RecoveryConfig {
    /// Creates a new configuration with the specified request timeout in seconds.
    pub fn with_timeout_secs(secs: u64) -> Self {
        Self {
            request_timeout: secs,
            ..Self::default()
        }
    }

    /// Sets whether error details are written to 500 responses.
    pub fn with_error_details(self, expose: bool) -> Self {
        Self {
            expose_error_details: expose,
            ..self
        }
    }

    /// Returns the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

/// Extension trait for `axum::`[`Router`] to apply recovery middleware.
pub trait RouterRecoveryExt<S> {
    /// Layers recovery middleware with the provided configuration.
    ///
    /// This middleware stack handles request timeouts, panics in handlers,
    /// and handler errors, converting them to the global error response.
    fn with_recovery(self, config: &RecoveryConfig) -> Self;

    /// Layers recovery middleware with default configuration.
    ///
    /// Uses a 30-second timeout and hides error details.
    fn with_default_recovery(self) -> Self;
}

impl<S> RouterRecoveryExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_recovery(self, config: &RecoveryConfig) -> Self {
        let middlewares = ServiceBuilder::new()
            .layer(from_fn_with_state(
                config.expose_error_details,
                disclose_error_details,
            ))
            .layer(HandleErrorLayer::new(handle_error))
            .layer(CatchPanicLayer::custom(catch_panic))
            .layer(TimeoutLayer::new(config.request_timeout()));

        self.layer(middlewares)
    }

    fn with_default_recovery(self) -> Self {
        self.with_recovery(&RecoveryConfig::default())
    }
}

/// Logs error details and writes them to the body when exposure is enabled.
async fn disclose_error_details(
    State(expose): State<bool>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    let Some(ErrorDetail(detailed)) = response.extensions_mut().remove::<ErrorDetail>() else {
        return response;
    };

    if response.status().is_server_error() {
        tracing::error!(
            target: TRACING_TARGET_RECOVERY_ERROR,
            status = %response.status(),
            error = %detailed.message,
            "Request failed"
        );
    } else {
        tracing::debug!(
            target: TRACING_TARGET_RECOVERY_ERROR,
            status = %response.status(),
            error = %detailed.message,
            "Request rejected"
        );
    }

    if !expose {
        return response;
    }

    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    let (_, body) = detailed.into_response().into_parts();

    Response::from_parts(parts, body)
}

fn handle_error(err: tower::BoxError) -> ResponseFut {
    use tower::timeout::error::Elapsed;

    let error = if err.is::<Elapsed>() {
        ErrorKind::InternalServerError.with_context(err.to_string())
    } else {
        ErrorKind::InternalServerError.with_context(format!("Unhandled middleware error: {err}"))
    };

    ready(error.into_response()).boxed()
}

fn catch_panic(err: Panic) -> Response {
    let message = err
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| err.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic type");

    tracing::error!(
        target: TRACING_TARGET_RECOVERY_PANIC,
        message = %message,
        "Service panic"
    );

    ErrorKind::InternalServerError
        .with_context(message.to_owned())
        .into_response()
}
