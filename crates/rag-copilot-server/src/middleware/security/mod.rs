//! Security middleware for HTTP requests.

mod cors;

use axum::Router;
pub use cors::{CorsConfig, create_cors_layer};

/// Extension trait for `axum::`[`Router`] to apply security middleware.
pub trait RouterSecurityExt<S> {
    /// Layers the CORS policy built from the provided configuration.
    fn with_security(self, cors: &CorsConfig) -> Self;

    /// Layers the default CORS policy, which allows no origins.
    fn with_default_security(self) -> Self;
}

impl<S> RouterSecurityExt<S> for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_security(self, cors: &CorsConfig) -> Self {
        self.layer(create_cors_layer(cors))
    }

    fn with_default_security(self) -> Self {
        self.with_security(&CorsConfig::default())
    }
}
