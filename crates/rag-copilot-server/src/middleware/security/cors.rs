//! CORS (Cross-Origin Resource Sharing) middleware configuration.

use std::time::Duration;

use axum::http::HeaderValue;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

use crate::config::Settings;
use crate::utility::tracing_targets::TRACING_TARGET_ROUTER;

/// Origin entry that allows any origin.
const ANY_ORIGIN: &str = "*";

/// Creates a CORS layer based on the provided configuration.
///
/// Allowed origins may use any method and any header. Methods and headers are
/// mirrored from the preflight request, which stays valid when credentials
/// are allowed. A `*` entry mirrors the request origin.
pub fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    let allow_origin = if config.allows_any_origin() {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::list(config.to_header_values())
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials)
        .max_age(config.max_age())
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct CorsConfig {
    /// List of allowed CORS origins.
    pub allowed_origins: Vec<String>,

    /// Maximum age for CORS preflight requests in seconds.
    pub max_age_seconds: u64,

    /// Whether to allow credentials in CORS requests.
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: Vec::new(),
            max_age_seconds: 600,
            allow_credentials: true,
        }
    }
}

impl CorsConfig {
    /// Creates a configuration allowing the origins listed in `CORS_ORIGINS`.
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            allowed_origins: settings.cors_origins.clone(),
            ..Self::default()
        }
    }

    /// Returns the CORS max age as a Duration.
    pub fn max_age(&self) -> Duration {
        Duration::from_secs(self.max_age_seconds)
    }

    /// Returns whether the list contains the `*` wildcard.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins
            .iter()
            .any(|origin| origin.trim() == ANY_ORIGIN)
    }

    /// Converts configured origins to a `HeaderValue` list.
    ///
    /// Origins that are not valid header values are skipped.
    pub fn to_header_values(&self) -> Vec<HeaderValue> {
        self.allowed_origins
            .iter()
            .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(
                        target: TRACING_TARGET_ROUTER,
                        origin = %origin,
                        "Ignoring invalid CORS origin"
                    );
                    None
                }
            })
            .collect()
    }
}
