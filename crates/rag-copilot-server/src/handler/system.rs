//! System endpoints: liveness and service discovery.
//!
//! Both handlers only read the settings snapshot. They never touch
//! downstream resources, so they stay available while collaborators are down.

use std::sync::Arc;

use aide::axum::ApiRouter;
use aide::transform::TransformOperation;
use axum::Json;
use axum::extract::State;

use crate::config::Settings;
use crate::handler::response::{HealthStatus, Welcome};
use crate::middleware::DOCS_PATH;
use crate::service::ServiceState;
use crate::utility::tracing_targets::TRACING_TARGET_SYSTEM;

/// Path of the health check endpoint.
pub const HEALTH_PATH: &str = "/health";

/// Reports that the process is up.
#[tracing::instrument(skip_all)]
async fn health_check(State(settings): State<Arc<Settings>>) -> Json<HealthStatus> {
    tracing::trace!(target: TRACING_TARGET_SYSTEM, "Health check requested");
    Json(HealthStatus::healthy(&settings))
}

fn health_check_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Health check")
        .description("Returns the liveness status with the application name, version and environment.")
        .response::<200, Json<HealthStatus>>()
}

/// Describes the service and links to the health check and docs.
#[tracing::instrument(skip_all)]
async fn root(State(settings): State<Arc<Settings>>) -> Json<Welcome> {
    tracing::trace!(target: TRACING_TARGET_SYSTEM, "Welcome document requested");
    Json(Welcome::new(&settings, DOCS_PATH, HEALTH_PATH))
}

fn root_docs(op: TransformOperation) -> TransformOperation {
    op.summary("Service information")
        .description(
            "Returns a welcome message, the application version and the paths of the \
             interactive documentation and the health check.",
        )
        .response::<200, Json<Welcome>>()
}

/// Returns routes for the system endpoints.
pub fn routes() -> ApiRouter<ServiceState> {
    use aide::axum::routing::*;

    ApiRouter::new()
        .api_route(HEALTH_PATH, get_with(health_check, health_check_docs))
        .api_route("/", get_with(root, root_docs))
        .with_path_items(|item| item.tag("System"))
}
