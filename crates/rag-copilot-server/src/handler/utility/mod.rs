//! Helpers for assembling handler routers.

mod custom_routes;

pub use custom_routes::{CustomRoutes, RouterMapFn};
