use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::config::Settings;

/// Liveness report returned by `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct HealthStatus {
    /// Always `healthy` while the process is serving requests.
    pub status: String,
    pub app_name: String,
    pub version: String,
    /// Deployment stage, lowercase.
    pub environment: String,
}

impl HealthStatus {
    /// Status reported while the process is serving requests.
    pub const HEALTHY: &'static str = "healthy";

    /// Builds the healthy report for the running application.
    pub fn healthy(settings: &Settings) -> Self {
        Self {
            status: Self::HEALTHY.to_owned(),
            app_name: settings.app_name.clone(),
            version: settings.app_version.clone(),
            environment: settings.environment.to_string(),
        }
    }
}

/// Service discovery document returned by `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Welcome {
    pub message: String,
    pub version: String,
    /// Interactive documentation path, or a notice that docs are disabled.
    pub docs: String,
    /// Health check path.
    pub health: String,
}

impl Welcome {
    /// Value of `docs` when interactive documentation is not served.
    pub const DOCS_DISABLED: &'static str = "Disabled in production";

    /// Builds the welcome document, pointing at `docs_path` in debug mode.
    pub fn new(settings: &Settings, docs_path: &str, health_path: &str) -> Self {
        let docs = if settings.debug {
            docs_path.to_owned()
        } else {
            Self::DOCS_DISABLED.to_owned()
        };

        Self {
            message: format!("Welcome to {}", settings.app_name),
            version: settings.app_version.clone(),
            docs,
            health: health_path.to_owned(),
        }
    }
}
