//! Middleware for `axum::Router` and HTTP request processing.
//!
//! This module provides middleware for:
//! - Security (CORS)
//! - Observability (tracing, request IDs)
//! - Recovery (handler errors, panics, timeouts)
//! - OpenAPI documentation
//!
//! # Quick Start
//!
//! ```rust
//! use aide::axum::ApiRouter;
//! use axum::Router;
//! use rag_copilot_server::middleware::{
//!     CorsConfig, OpenApiConfig, RecoveryConfig, RouterObservabilityExt, RouterOpenApiExt,
//!     RouterRecoveryExt, RouterSecurityExt,
//! };
//!
//! let app: Router = ApiRouter::new()
//!     .with_open_api(&OpenApiConfig::default())
//!     .with_security(&CorsConfig::default())
//!     .with_recovery(&RecoveryConfig::default())
//!     .with_observability();
//! ```

mod observability;
mod recovery;
mod security;
mod specification;

pub use observability::{REQUEST_ID_HEADER, RouterObservabilityExt};
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
pub use security::{CorsConfig, RouterSecurityExt, create_cors_layer};
pub use specification::{
    API_DESCRIPTION, DOCS_PATH, OPENAPI_JSON_PATH, OpenApiConfig, REDOC_PATH, RouterOpenApiExt,
};
