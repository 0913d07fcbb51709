//! OpenAPI specification middleware with Scalar and ReDoc UIs.
//!
//! Documentation is generated from aide's [`ApiRouter`] and served only when
//! the application runs in debug mode. Outside debug mode the router is
//! converted as-is and the documentation paths fall through to the 404
//! fallback.
//!
//! # Usage
//!
//! ```rust
//! use aide::axum::ApiRouter;
//! use axum::Router;
//! use rag_copilot_server::middleware::{OpenApiConfig, RouterOpenApiExt};
//!
//! let app: Router<()> = ApiRouter::new()
//!     .with_open_api(&OpenApiConfig::default());
//! ```
//!
//! [`ApiRouter`]: aide::axum::ApiRouter

use aide::axum::ApiRouter;
use aide::openapi::{Info, OpenApi};
use aide::redoc::Redoc;
use aide::scalar::Scalar;
use axum::routing::{Router, get};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// Path of the interactive Scalar reference.
pub const DOCS_PATH: &str = "/docs";

/// Path of the ReDoc reference.
pub const REDOC_PATH: &str = "/redoc";

/// Path of the generated OpenAPI document.
pub const OPENAPI_JSON_PATH: &str = "/openapi.json";

/// Description published in the OpenAPI info object.
pub const API_DESCRIPTION: &str =
    "A secure, self-contained RAG assistant for querying internal documentation";

/// OpenAPI configuration for aide integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct OpenApiConfig {
    /// Whether documentation routes are mounted at all.
    pub enabled: bool,
    /// Title of the API.
    pub title: String,
    /// Version of the API.
    pub version: String,
    /// Path which exposes the OpenAPI JSON specification.
    pub open_api_json: String,
    /// Path which exposes the Scalar API reference UI.
    pub scalar_ui: String,
    /// Path which exposes the ReDoc UI.
    pub redoc_ui: String,
}

impl OpenApiConfig {
    /// Derives the documentation config from application settings.
    ///
    /// Documentation is enabled exactly when `settings.debug` is set.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            enabled: settings.debug,
            title: settings.app_name.clone(),
            version: settings.app_version.clone(),
            ..Self::default()
        }
    }

    fn info(&self) -> Info {
        Info {
            title: self.title.clone(),
            description: Some(API_DESCRIPTION.to_owned()),
            version: self.version.clone(),
            ..Info::default()
        }
    }
}

impl Default for OpenApiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            title: "Private RAG Copilot".to_owned(),
            version: env!("CARGO_PKG_VERSION").to_owned(),
            open_api_json: OPENAPI_JSON_PATH.to_owned(),
            scalar_ui: DOCS_PATH.to_owned(),
            redoc_ui: REDOC_PATH.to_owned(),
        }
    }
}

/// Extension trait for [`ApiRouter`] to add OpenAPI documentation.
///
/// [`ApiRouter`]: aide::axum::ApiRouter
pub trait RouterOpenApiExt<S> {
    /// Finishes the router, mounting documentation routes when enabled.
    ///
    /// When enabled this method:
    /// - Generates the OpenAPI specification from the router's API routes
    /// - Adds a route to serve the OpenAPI JSON specification
    /// - Adds routes to serve the Scalar and ReDoc UIs
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S>;
}

impl<S> RouterOpenApiExt<S> for ApiRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_open_api(self, config: &OpenApiConfig) -> Router<S> {
        if !config.enabled {
            return Router::from(self);
        }

        async fn serve_openapi(Extension(api): Extension<OpenApi>) -> Json<OpenApi> {
            Json(api)
        }

        let mut api = OpenApi {
            info: config.info(),
            ..OpenApi::default()
        };

        let scalar = Scalar::new(&config.open_api_json);
        let redoc = Redoc::new(&config.open_api_json);
        let router = self
            .route(&config.scalar_ui, scalar.axum_route())
            .route(&config.redoc_ui, redoc.axum_route())
            .route(&config.open_api_json, get(serve_openapi));

        router.finish_api(&mut api).layer(Extension(api))
    }
}
