//! Deployment stage accepted by the `ENVIRONMENT` setting.

use serde::{Deserialize, Deserializer};
use strum::{AsRefStr, Display, EnumString, VariantNames};

/// Deployment stage, parsed case-insensitively and displayed lowercase.
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
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Returns whether this is the production stage.
    #[inline]
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        value.trim().parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "environment must be one of {:?}, got '{value}'",
                Self::VARIANTS
            ))
        })
    }
}
