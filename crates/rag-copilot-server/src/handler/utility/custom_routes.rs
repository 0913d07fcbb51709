//! Custom routes for extending the API router.

use aide::axum::ApiRouter;

use crate::service::ServiceState;

/// Type alias for a function that maps an [`ApiRouter`] before it is mounted.
pub type RouterMapFn = fn(ApiRouter<ServiceState>) -> ApiRouter<ServiceState>;

/// Routers mounted under the configured `API_PREFIX`.
///
/// This is where retrieval, ingestion and chat routers plug in. They inherit
/// the CORS, observability and recovery middleware of the application.
///
/// # Examples
///
/// ```rust
/// use aide::axum::ApiRouter;
/// use rag_copilot_server::handler::CustomRoutes;
///
/// let custom = CustomRoutes::new().with_api_routes(ApiRouter::new());
/// assert!(!custom.is_empty());
/// ```
#[derive(Default)]
pub struct CustomRoutes {
    /// Routes mounted under the API prefix.
    pub api_routes: Option<ApiRouter<ServiceState>>,
    /// Function applied to the API routes before they are mounted.
    pub before_mount: Option<RouterMapFn>,
}

impl CustomRoutes {
    /// Creates a new empty `CustomRoutes` instance.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API routes, replacing any existing ones.
    pub fn with_api_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.api_routes = Some(routes);
        self
    }

    /// Adds API routes, merging with existing routes if any.
    pub fn add_api_routes(mut self, routes: ApiRouter<ServiceState>) -> Self {
        self.api_routes = Some(match self.api_routes {
            Some(existing) => existing.merge(routes),
            None => routes,
        });
        self
    }

    /// Sets a function applied to the API routes before they are mounted.
    ///
    /// Use this to attach route-level layers to every custom route at once.
    pub fn with_before_mount(mut self, f: RouterMapFn) -> Self {
        self.before_mount = Some(f);
        self
    }

    /// Returns true if no custom routes are configured.
    pub fn is_empty(&self) -> bool {
        self.api_routes.is_none()
    }

    /// Merges this `CustomRoutes` with another, combining all routes.
    pub fn merge(mut self, other: CustomRoutes) -> Self {
        if let Some(routes) = other.api_routes {
            self = self.add_api_routes(routes);
        }
        if self.before_mount.is_none() {
            self.before_mount = other.before_mount;
        }
        self
    }

    /// Takes the API routes with the mount function applied.
    pub(crate) fn take_api_routes(&mut self) -> Option<ApiRouter<ServiceState>> {
        let routes = self.api_routes.take()?;
        Some(match self.before_mount {
            Some(f) => f(routes),
            None => routes,
        })
    }
}
