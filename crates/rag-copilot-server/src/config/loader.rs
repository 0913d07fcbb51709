//! Builds a [`Settings`] snapshot from environment variables and a dotenv file.

use std::path::{Path, PathBuf};

use config::{Config, Environment as EnvironmentSource, Map};
use validator::Validate;

use super::{Settings, SettingsError, SettingsResult};
use crate::utility::tracing_targets::TRACING_TARGET_CONFIG;

/// Default dotenv override file, relative to the working directory.
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Loader for the application [`Settings`].
///
/// Variables come from two places, lowest precedence first:
///
/// 1. the dotenv file (default `.env`), if it exists;
/// 2. the process environment, or the explicit set given to
///    [`with_vars`](Self::with_vars).
///
/// Names are matched case-insensitively and empty values count as unset.
/// The process environment is only read, never modified.
///
/// # Example
///
/// ```rust
/// use rag_copilot_server::config::SettingsLoader;
///
/// let settings = SettingsLoader::new()
///     .without_env_file()
///     .with_vars([("OPENAI_API_KEY", "sk-test"), ("DEBUG", "true")])
///     .load()
///     .unwrap();
///
/// assert!(settings.debug);
/// ```
#[derive(Debug, Clone)]
#[must_use = "loader does nothing unless you call `load`"]
pub struct SettingsLoader {
    env_file: Option<PathBuf>,
    vars: Option<Vec<(String, String)>>,
}

impl SettingsLoader {
    /// Creates a loader that reads the process environment and `./.env`.
    pub fn new() -> Self {
        Self {
            env_file: Some(PathBuf::from(DEFAULT_ENV_FILE)),
            vars: None,
        }
    }

    /// Reads overrides from the given dotenv file instead of `./.env`.
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Skips the dotenv file entirely.
    pub fn without_env_file(mut self) -> Self {
        self.env_file = None;
        self
    }

    /// Uses the given variables in place of the process environment.
    pub fn with_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.vars = Some(vars);
        self
    }

    /// Returns the configured dotenv file path, if any.
    #[must_use]
    pub fn env_file(&self) -> Option<&Path> {
        self.env_file.as_deref()
    }

    /// Builds and validates the settings snapshot.
    ///
    /// # Errors
    ///
    /// - [`SettingsError::EnvFile`] if the dotenv file exists but is unreadable.
    /// - [`SettingsError::Load`] if `OPENAI_API_KEY` is missing, a value cannot
    ///   be coerced to its type, or `ENVIRONMENT`/`LOG_LEVEL` is not recognized.
    /// - [`SettingsError::Validation`] if numeric values are out of bounds.
    pub fn load(self) -> SettingsResult<Settings> {
        let mut source = Map::new();

        if let Some(path) = self.env_file.as_deref() {
            for (key, value) in read_env_file(path)? {
                source.insert(key.to_lowercase(), value);
            }
        }

        let vars = match self.vars {
            Some(vars) => vars,
            None => process_vars(),
        };

        for (key, value) in vars {
            source.insert(key.to_lowercase(), value);
        }

        let environment = EnvironmentSource::default()
            .ignore_empty(true)
            .source(Some(source));

        let settings: Settings = Config::builder()
            .add_source(environment)
            .build()?
            .try_deserialize()?;

        settings.validate()?;

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            settings = %settings,
            "Settings loaded"
        );

        Ok(settings)
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects the process environment, skipping entries that are not valid
/// Unicode.
fn process_vars() -> Vec<(String, String)> {
    std::env::vars_os()
        .filter_map(|(key, value)| match (key.into_string(), value.into_string()) {
            (Ok(key), Ok(value)) => Some((key, value)),
            (key, _) => {
                tracing::debug!(
                    target: TRACING_TARGET_CONFIG,
                    key = ?key,
                    "Skipping non-unicode environment variable"
                );
                None
            }
        })
        .collect()
}

/// Reads key-value pairs from a dotenv file. A missing file yields nothing.
fn read_env_file(path: &Path) -> SettingsResult<Vec<(String, String)>> {
    let env_file_error = |source| SettingsError::EnvFile {
        path: path.to_path_buf(),
        source,
    };

    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(err) if err.not_found() => {
            tracing::debug!(
                target: TRACING_TARGET_CONFIG,
                path = %path.display(),
                "No env file found, using process environment only"
            );
            return Ok(Vec::new());
        }
        Err(err) => return Err(env_file_error(err)),
    };

    let pairs = iter
        .collect::<Result<Vec<_>, _>>()
        .map_err(env_file_error)?;

    tracing::debug!(
        target: TRACING_TARGET_CONFIG,
        path = %path.display(),
        variables = pairs.len(),
        "Env file loaded"
    );

    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::config::{Environment, LogLevel};

    const API_KEY: (&str, &str) = ("OPENAI_API_KEY", "sk-test-key");

    fn load<'a>(vars: impl IntoIterator<Item = (&'a str, &'a str)>) -> SettingsResult<Settings> {
        SettingsLoader::new()
            .without_env_file()
            .with_vars(vars)
            .load()
    }

    fn load_with_key<'a>(
        vars: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> SettingsResult<Settings> {
        load(std::iter::once(API_KEY).chain(vars))
    }

    #[test]
    fn defaults_apply_when_unset() -> anyhow::Result<()> {
        let settings = load_with_key([])?;

        assert_eq!(settings.app_name, "Private RAG Copilot");
        assert_eq!(settings.app_version, "1.0.0");
        assert!(!settings.debug);
        assert_eq!(settings.environment, Environment::Development);
        assert_eq!(settings.api_host, "0.0.0.0");
        assert_eq!(settings.api_port, 8000);
        assert_eq!(settings.api_prefix, "/api/v1");
        assert_eq!(
            settings.cors_origins,
            vec!["http://localhost:3000", "http://localhost:8000"]
        );
        assert_eq!(settings.openai_api_key, "sk-test-key");
        assert_eq!(settings.openai_model, "gpt-4-turbo-preview");
        assert_eq!(settings.openai_embedding_model, "text-embedding-3-small");
        assert!((settings.openai_temperature - 0.1).abs() < f64::EPSILON);
        assert_eq!(settings.openai_max_tokens, 1000);
        assert!(settings.use_supabase);
        assert!(!settings.use_pinecone);
        assert_eq!(settings.supabase_url, None);
        assert_eq!(settings.pinecone_index_name, "rag-copilot");
        assert_eq!(settings.postgres_port, 5432);
        assert_eq!(settings.postgres_db, "postgres");
        assert_eq!(settings.chunk_size, 1000);
        assert_eq!(settings.chunk_overlap, 200);
        assert_eq!(settings.retrieval_top_k, 20);
        assert_eq!(settings.rerank_top_k, 3);
        assert!(!settings.enable_reranking);
        assert!((settings.similarity_threshold - 0.7).abs() < f64::EPSILON);
        assert_eq!(settings.jwt_secret_key, "CHANGE_ME_IN_PRODUCTION");
        assert_eq!(settings.jwt_algorithm, "HS256");
        assert_eq!(settings.jwt_expiry_minutes, 1440);
        assert_eq!(settings.log_level, LogLevel::Info);
        assert_eq!(settings.log_format, "json");
        assert!(!settings.rate_limit_enabled);
        assert_eq!(settings.rate_limit_requests, 100);
        assert_eq!(settings.rate_limit_window_seconds, 60);
        assert!(settings.enable_metrics);
        assert!(settings.metrics_log_queries);

        Ok(())
    }

    #[test]
    fn overrides_are_coerced() -> anyhow::Result<()> {
        let settings = load_with_key([
            ("APP_NAME", "Docs Copilot"),
            ("DEBUG", "true"),
            ("API_PORT", "9000"),
            ("OPENAI_TEMPERATURE", "0.5"),
            ("USE_PINECONE", "1"),
            ("USE_SUPABASE", "off"),
            ("CHUNK_SIZE", "4000"),
            ("RATE_LIMIT_WINDOW_SECONDS", "120"),
        ])?;

        assert_eq!(settings.app_name, "Docs Copilot");
        assert!(settings.debug);
        assert_eq!(settings.api_port, 9000);
        assert!((settings.openai_temperature - 0.5).abs() < f64::EPSILON);
        assert!(settings.use_pinecone);
        assert!(!settings.use_supabase);
        assert_eq!(settings.chunk_size, 4000);
        assert_eq!(settings.rate_limit_window_seconds, 120);

        Ok(())
    }

    #[test]
    fn variable_names_are_case_insensitive() -> anyhow::Result<()> {
        let settings = load([
            ("openai_api_key", "sk-lower"),
            ("App_Name", "Mixed Case"),
        ])?;

        assert_eq!(settings.openai_api_key, "sk-lower");
        assert_eq!(settings.app_name, "Mixed Case");
        Ok(())
    }

    #[test]
    fn unknown_variables_are_ignored() {
        assert!(load_with_key([("NOT_A_SETTING", "whatever"), ("PATH", "/usr/bin")]).is_ok());
    }

    #[test]
    fn missing_api_key_fails() {
        let error = load([("DEBUG", "true"), ("CHUNK_SIZE", "500")]).unwrap_err();

        assert!(matches!(error, SettingsError::Load(_)));
        assert!(error.to_string().contains("openai_api_key"));
    }

    #[test]
    fn empty_api_key_counts_as_missing() {
        assert!(load([("OPENAI_API_KEY", "")]).is_err());
    }

    #[test]
    fn temperature_bounds_are_inclusive() {
        assert!(load_with_key([("OPENAI_TEMPERATURE", "2.0")]).is_ok());
        assert!(load_with_key([("OPENAI_TEMPERATURE", "0.0")]).is_ok());

        for value in ["3.0", "2.0001", "-0.1"] {
            let error = load_with_key([("OPENAI_TEMPERATURE", value)]).unwrap_err();
            assert!(
                error.to_string().contains("openai_temperature"),
                "unexpected error for {value}: {error}"
            );
        }
    }

    #[test]
    fn non_finite_floats_are_rejected() {
        for key in ["OPENAI_TEMPERATURE", "SIMILARITY_THRESHOLD"] {
            let field = key.to_lowercase();
            for value in ["NaN", "nan", "inf", "-inf"] {
                let error = load_with_key([(key, value)]).unwrap_err();
                let violations = error.violations();
                assert!(!violations.is_empty(), "{key}={value} was accepted");
                assert!(violations.iter().all(|v| v.field == field), "{key}={value}");
            }
        }

        let error = load_with_key([("SIMILARITY_THRESHOLD", "NaN")]).unwrap_err();
        assert!(error.to_string().contains("must be a finite number"));
    }

    #[test]
    fn numeric_fields_reject_boolean_words() {
        let cases = [
            ("OPENAI_MAX_TOKENS", "yes"),
            ("RERANK_TOP_K", "on"),
            ("CHUNK_OVERLAP", "no"),
            ("API_PORT", "off"),
            ("OPENAI_TEMPERATURE", "true"),
            ("SIMILARITY_THRESHOLD", "false"),
        ];

        for (key, value) in cases {
            let error = load_with_key([(key, value)]).unwrap_err();
            assert!(matches!(error, SettingsError::Load(_)), "{key}={value}");
            assert!(
                error.to_string().contains(&key.to_lowercase()),
                "unexpected error for {key}={value}: {error}"
            );
        }
    }

    #[test]
    fn numeric_strings_are_trimmed() -> anyhow::Result<()> {
        let settings = load_with_key([("RERANK_TOP_K", " 5 "), ("OPENAI_TEMPERATURE", "1")])?;
        assert_eq!(settings.rerank_top_k, 5);
        assert!((settings.openai_temperature - 1.0).abs() < f64::EPSILON);
        Ok(())
    }

    #[test]
    fn integer_bounds_name_the_field() {
        let cases = [
            ("CHUNK_SIZE", "99", "chunk_size"),
            ("CHUNK_SIZE", "4001", "chunk_size"),
            ("CHUNK_OVERLAP", "1001", "chunk_overlap"),
            ("RETRIEVAL_TOP_K", "0", "retrieval_top_k"),
            ("RETRIEVAL_TOP_K", "101", "retrieval_top_k"),
            ("RERANK_TOP_K", "21", "rerank_top_k"),
            ("SIMILARITY_THRESHOLD", "1.5", "similarity_threshold"),
            ("OPENAI_MAX_TOKENS", "0", "openai_max_tokens"),
            ("JWT_EXPIRY_MINUTES", "0", "jwt_expiry_minutes"),
        ];

        for (key, value, field) in cases {
            let error = load_with_key([(key, value)]).unwrap_err();
            let violations = error.violations();
            assert_eq!(violations.len(), 1, "{key}={value}");
            assert_eq!(violations[0].field, field);
        }
    }

    #[test]
    fn all_violations_are_reported() {
        let error =
            load_with_key([("CHUNK_SIZE", "10"), ("RERANK_TOP_K", "50")]).unwrap_err();

        let fields: Vec<_> = error.violations().iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, ["chunk_size", "rerank_top_k"]);
        assert!(error.to_string().contains("must be between 100 and 4000"));
    }

    #[test]
    fn uncoercible_values_fail() {
        let error = load_with_key([("API_PORT", "eighty")]).unwrap_err();
        assert!(matches!(error, SettingsError::Load(_)));
        assert!(error.to_string().contains("api_port"));

        assert!(load_with_key([("DEBUG", "maybe")]).is_err());
        assert!(load_with_key([("CHUNK_OVERLAP", "-1")]).is_err());
    }

    #[test]
    fn log_level_is_normalized() -> anyhow::Result<()> {
        let settings = load_with_key([("LOG_LEVEL", "debug")])?;
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.log_level.to_string(), "DEBUG");

        let error = load_with_key([("LOG_LEVEL", "TRACE")]).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("log_level"));
        assert!(message.contains("CRITICAL"));

        Ok(())
    }

    #[test]
    fn environment_is_normalized() -> anyhow::Result<()> {
        let settings = load_with_key([("ENVIRONMENT", "PRODUCTION")])?;
        assert_eq!(settings.environment, Environment::Production);
        assert_eq!(settings.environment.to_string(), "production");

        let error = load_with_key([("ENVIRONMENT", "prod")]).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("environment"));
        assert!(message.contains("staging"));

        Ok(())
    }

    #[test]
    fn cors_origins_accept_json_and_comma_lists() -> anyhow::Result<()> {
        let settings = load_with_key([(
            "CORS_ORIGINS",
            r#"["https://a.example.com", "https://b.example.com"]"#,
        )])?;
        assert_eq!(
            settings.cors_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );

        let settings = load_with_key([(
            "CORS_ORIGINS",
            "https://a.example.com, https://b.example.com,",
        )])?;
        assert_eq!(
            settings.cors_origins,
            vec!["https://a.example.com", "https://b.example.com"]
        );

        assert!(load_with_key([("CORS_ORIGINS", "[not json")]).is_err());
        Ok(())
    }

    #[test]
    fn env_file_is_read_and_process_vars_win() -> anyhow::Result<()> {
        let mut file = tempfile::NamedTempFile::new()?;
        writeln!(file, "APP_NAME=From File")?;
        writeln!(file, "app_version=2.0.0")?;
        writeln!(file, "OPENAI_API_KEY=sk-from-file")?;
        file.flush()?;

        let settings = SettingsLoader::new()
            .with_env_file(file.path())
            .with_vars([("APP_NAME", "From Process")])
            .load()?;

        assert_eq!(settings.app_name, "From Process");
        assert_eq!(settings.app_version, "2.0.0");
        assert_eq!(settings.openai_api_key, "sk-from-file");
        Ok(())
    }

    #[test]
    fn missing_env_file_is_ignored() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let settings = SettingsLoader::new()
            .with_env_file(dir.path().join("missing.env"))
            .with_vars([API_KEY])
            .load()?;

        assert_eq!(settings.openai_api_key, "sk-test-key");
        Ok(())
    }
}
