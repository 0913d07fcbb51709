//! All `aide::axum::`[`ApiRouter`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use aide::axum::ApiRouter;
//! use axum::Router;
//! use rag_copilot_server::config::SettingsLoader;
//! use rag_copilot_server::handler::{CustomRoutes, routes};
//! use rag_copilot_server::middleware::{OpenApiConfig, RouterOpenApiExt};
//! use rag_copilot_server::service::ServiceState;
//!
//! # fn example() -> anyhow::Result<()> {
//! let settings = SettingsLoader::new()
//!     .without_env_file()
//!     .with_vars([("OPENAI_API_KEY", "sk-test")])
//!     .load()?;
//! let settings = Arc::new(settings);
//!
//! // Routers mounted under API_PREFIX
//! let custom_routes = CustomRoutes::new().with_api_routes(ApiRouter::new());
//!
//! let router: Router = routes(custom_routes, &settings)
//!     .with_open_api(&OpenApiConfig::from_settings(&settings))
//!     .with_state(ServiceState::new(settings));
//! # Ok(())
//! # }
//! ```
//!
//! [`ApiRouter`]: aide::axum::ApiRouter
//! [`Handler`]: axum::handler::Handler

mod error;
mod response;
mod system;
mod utility;

use aide::axum::ApiRouter;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorDetail, ErrorKind, Result};
pub use crate::handler::response::{ErrorResponse, HealthStatus, Welcome};
pub use crate::handler::system::HEALTH_PATH;
pub use crate::handler::utility::{CustomRoutes, RouterMapFn};
use crate::config::Settings;
use crate::service::ServiceState;
use crate::utility::tracing_targets::TRACING_TARGET_ROUTER;

/// Fallback for requests that match no route.
#[inline]
async fn not_found() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns an [`ApiRouter`] with all routes.
///
/// System routes are mounted at the root. Custom routes are nested under the
/// normalized `API_PREFIX`, or merged at the root when the prefix is empty.
pub fn routes(mut custom_routes: CustomRoutes, settings: &Settings) -> ApiRouter<ServiceState> {
    let mut router = ApiRouter::new().merge(system::routes());

    if let Some(api_routes) = custom_routes.take_api_routes() {
        let prefix = settings.route_prefix();

        tracing::debug!(
            target: TRACING_TARGET_ROUTER,
            prefix = %prefix,
            "Mounting API routes"
        );

        router = if prefix.is_empty() {
            router.merge(api_routes)
        } else {
            router.nest(&prefix, api_routes)
        };
    }

    router.fallback(not_found)
}

#[cfg(test)]
pub(crate) mod test {
    use std::sync::Arc;

    use axum::Router;
    use axum_test::TestServer;

    use crate::config::{Settings, SettingsLoader};
    use crate::handler::{CustomRoutes, routes};
    use crate::middleware::{
        CorsConfig, OpenApiConfig, RecoveryConfig, RouterObservabilityExt, RouterOpenApiExt,
        RouterRecoveryExt, RouterSecurityExt,
    };
    use crate::service::ServiceState;

    /// Loads settings from the given variables plus a test API key.
    pub fn test_settings<'a>(
        vars: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> anyhow::Result<Arc<Settings>> {
        let settings = SettingsLoader::new()
            .without_env_file()
            .with_vars([("OPENAI_API_KEY", "sk-test-key")].into_iter().chain(vars))
            .load()?;
        Ok(Arc::new(settings))
    }

    /// Returns the fully layered application router.
    pub fn create_test_router(
        settings: Arc<Settings>,
        custom_routes: CustomRoutes,
        recovery: RecoveryConfig,
    ) -> Router {
        let state = ServiceState::new(Arc::clone(&settings));
        let router: Router = routes(custom_routes, &settings)
            .with_open_api(&OpenApiConfig::from_settings(&settings))
            .with_state(state);

        router
            .with_security(&CorsConfig::from_settings(&settings))
            .with_recovery(&recovery.with_error_details(settings.debug))
            .with_observability()
    }

    /// Returns a new [`TestServer`] with custom routes and recovery settings.
    pub fn create_test_server_with_routes<'a>(
        vars: impl IntoIterator<Item = (&'a str, &'a str)>,
        custom_routes: CustomRoutes,
        recovery: RecoveryConfig,
    ) -> anyhow::Result<TestServer> {
        let settings = test_settings(vars)?;
        let router = create_test_router(settings, custom_routes, recovery);
        Ok(TestServer::new(router)?)
    }

    /// Returns a new [`TestServer`] with the default routes.
    pub fn create_test_server<'a>(
        vars: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> anyhow::Result<TestServer> {
        create_test_server_with_routes(vars, CustomRoutes::new(), RecoveryConfig::default())
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server([])?;
        assert!(server.is_running());
        Ok(())
    }
}
