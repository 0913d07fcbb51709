//! Response types for HTTP handlers.

mod error_response;
mod system;

pub use error_response::ErrorResponse;
pub use system::{HealthStatus, Welcome};
