//! Observability middleware for request tracing.
//!
//! Every request gets a unique request id, propagated to the response as the
//! `x-request-id` header, and a tracing span covering its whole lifetime.

use axum::Router;
use axum::http::header;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::sensitive_headers::SetSensitiveRequestHeadersLayer;
use tower_http::trace::TraceLayer;

/// Header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension trait for `axum::`[`Router`] to apply observability middleware.
pub trait RouterObservabilityExt<S> {
    /// Layers observability middleware for request tracing and logging.
    ///
    /// This middleware stack generates unique request ids (or keeps the one
    /// sent by the client), adds a tracing span for each request, propagates
    /// request ids to responses, and marks credential headers as sensitive so
    /// they are redacted in logs.
    fn with_observability(self) -> Self;
}

impl<S> RouterObservabilityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_observability(self) -> Self {
        self.layer(PropagateRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
        ))
        .layer(SetSensitiveRequestHeadersLayer::new([
            header::AUTHORIZATION,
            header::COOKIE,
        ]))
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::new(
            header::HeaderName::from_static(REQUEST_ID_HEADER),
            MakeRequestUuid,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::test::create_test_server;

    #[tokio::test]
    async fn responses_carry_generated_request_id() -> anyhow::Result<()> {
        let server = create_test_server([])?;

        let first = server.get("/health").await.header(REQUEST_ID_HEADER);
        let second = server.get("/missing").await.header(REQUEST_ID_HEADER);

        assert!(!first.is_empty());
        assert_ne!(first, second);
        Ok(())
    }

    #[tokio::test]
    async fn client_request_id_is_propagated() -> anyhow::Result<()> {
        let server = create_test_server([])?;

        let response = server
            .get("/health")
            .add_header(REQUEST_ID_HEADER, "req-1234")
            .await;

        assert_eq!(response.header(REQUEST_ID_HEADER), "req-1234");
        Ok(())
    }
}
