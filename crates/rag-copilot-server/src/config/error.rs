//! Settings construction errors.

use std::fmt;
use std::path::PathBuf;

use validator::ValidationErrors;

/// Result type for settings construction.
pub type SettingsResult<T, E = SettingsError> = std::result::Result<T, E>;

/// A single field that failed its bound check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Name of the offending field, as spelled in the environment (lowercase).
    pub field: String,
    /// Description of the violated bound.
    pub message: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Error returned when a [`Settings`] snapshot cannot be constructed.
///
/// Construction is atomic: no partially populated settings exist when this
/// error is returned.
///
/// [`Settings`]: super::Settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// The dotenv override file exists but could not be read or parsed.
    #[error("failed to read env file {path}: {source}")]
    EnvFile {
        path: PathBuf,
        #[source]
        source: dotenvy::Error,
    },

    /// A required field is missing, or a value failed type coercion or the
    /// enum membership check.
    #[error("invalid settings: {0}")]
    Load(#[from] config::ConfigError),

    /// One or more numeric fields are outside their declared bounds.
    #[error("invalid settings: {}", join_violations(.0))]
    Validation(Vec<FieldViolation>),
}

impl SettingsError {
    /// Returns the bound violations, if this is a validation error.
    #[must_use]
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            Self::Validation(violations) => violations,
            _ => &[],
        }
    }
}

impl From<ValidationErrors> for SettingsError {
    fn from(errors: ValidationErrors) -> Self {
        let mut violations = Vec::new();

        for (field, field_errors) in errors.field_errors() {
            for error in field_errors {
                let message = error
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("failed the '{}' check", error.code));

                violations.push(FieldViolation {
                    field: field.to_string(),
                    message,
                });
            }
        }

        violations.sort_by(|a, b| a.field.cmp(&b.field));
        Self::Validation(violations)
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
