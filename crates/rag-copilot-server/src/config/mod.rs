//! Typed, validated application settings.
//!
//! The [`Settings`] snapshot is built exactly once at process start by a
//! [`SettingsLoader`] and shared read-only afterwards, usually behind an
//! [`Arc`](std::sync::Arc).
//!
//! # Sources
//!
//! Every field is read from the upper-cased environment variable of the same
//! name. Variables may also come from a dotenv file (`.env` by default);
//! the process environment wins when a name appears in both.
//!
//! # Example
//!
//! ```rust,no_run
//! use rag_copilot_server::config::Settings;
//!
//! let settings = Settings::from_env()?;
//! println!("{settings}");
//! # Ok::<(), rag_copilot_server::config::SettingsError>(())
//! ```

mod environment;
mod error;
mod loader;
mod log_level;
mod settings;

pub use environment::Environment;
pub use error::{FieldViolation, SettingsError, SettingsResult};
pub use loader::{DEFAULT_ENV_FILE, SettingsLoader};
pub use log_level::LogLevel;
pub use settings::Settings;
