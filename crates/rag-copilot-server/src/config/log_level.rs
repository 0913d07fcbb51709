//! Log verbosity accepted by the `LOG_LEVEL` setting.

use serde::{Deserialize, Deserializer};
use strum::{AsRefStr, Display, EnumString, VariantNames};
use tracing::level_filters::LevelFilter;

/// Logging level, parsed case-insensitively and displayed uppercase.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    AsRefStr,
    Display,
    EnumString,
    VariantNames
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Returns the equivalent `tracing` level filter.
    ///
    /// `tracing` has no dedicated critical level, so `Critical` maps to `ERROR`.
    #[must_use]
    pub const fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warning => LevelFilter::WARN,
            Self::Error | Self::Critical => LevelFilter::ERROR,
        }
    }
}

impl<'de> Deserialize<'de> for LogLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "log_level must be one of {:?}, got '{value}'",
                Self::VARIANTS
            ))
        })
    }
}
