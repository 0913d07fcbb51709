//! Tracing target constants for structured logging.
//!
//! Every log event emitted by this crate uses one of these targets, so output
//! can be filtered per concern with `RUST_LOG` directives such as
//! `rag_copilot_server::recovery=debug`.

/// Settings loading and dotenv file handling.
pub const TRACING_TARGET_CONFIG: &str = "rag_copilot_server::config";

/// Startup and shutdown hook execution.
pub const TRACING_TARGET_LIFECYCLE: &str = "rag_copilot_server::service::lifecycle";

/// System endpoints (health and welcome).
pub const TRACING_TARGET_SYSTEM: &str = "rag_copilot_server::handler::system";

/// Error recovery including handler errors and request timeouts.
pub const TRACING_TARGET_RECOVERY_ERROR: &str = "rag_copilot_server::recovery::error";

/// Panic recovery inside request handlers.
pub const TRACING_TARGET_RECOVERY_PANIC: &str = "rag_copilot_server::recovery::panic";

/// Router assembly and interactive documentation.
pub const TRACING_TARGET_ROUTER: &str = "rag_copilot_server::router";
