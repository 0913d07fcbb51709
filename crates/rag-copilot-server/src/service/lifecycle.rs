//! Ordered startup and shutdown of the application.
//!
//! A [`Lifecycle`] owns a list of [`LifecycleHook`]s. Starting runs every
//! hook's `startup` in registration order; stopping runs `shutdown` in
//! reverse order. The state machine has two states:
//!
//! ```text
//!            start()
//!   Stopped ---------> Running
//!      ^                  |
//!      +------------------+
//!            stop()
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use strum::{AsRefStr, Display};

use crate::config::Settings;
use crate::service::hooks::{EmbeddingCacheHook, ProviderCredentialsHook, VectorStoreHook};
use crate::utility::tracing_targets::TRACING_TARGET_LIFECYCLE;

/// Type alias for boxed dynamic errors returned by hooks.
pub type BoxedError = Box<dyn std::error::Error + Send + Sync>;

/// Result type for lifecycle transitions.
pub type LifecycleResult<T, E = LifecycleError> = std::result::Result<T, E>;

/// Errors returned by [`Lifecycle`] transitions.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// `start` was called while the application was running.
    #[error("application is already running")]
    AlreadyRunning,

    /// `stop` was called while the application was stopped.
    #[error("application is not running")]
    NotRunning,

    /// A startup or shutdown hook failed.
    #[error("{hook} hook failed: {source}")]
    Hook {
        hook: &'static str,
        #[source]
        source: BoxedError,
    },
}

/// Current state of a [`Lifecycle`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, AsRefStr, Display)]
#[strum(serialize_all = "lowercase")]
pub enum LifecycleState {
    #[default]
    Stopped,
    Running,
}

/// Extension point run during application startup and shutdown.
#[async_trait]
pub trait LifecycleHook: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    /// Runs before the application accepts requests.
    async fn startup(&self, settings: &Settings) -> Result<(), BoxedError>;

    /// Runs after the application stopped accepting requests.
    async fn shutdown(&self, settings: &Settings) -> Result<(), BoxedError>;
}

/// Startup/shutdown state machine with ordered hooks.
#[must_use = "lifecycle does nothing unless started"]
pub struct Lifecycle {
    settings: Arc<Settings>,
    hooks: Vec<Arc<dyn LifecycleHook>>,
    state: LifecycleState,
}

impl Lifecycle {
    /// Creates a lifecycle without hooks.
    pub fn new(settings: Arc<Settings>) -> Self {
        Self {
            settings,
            hooks: Vec::new(),
            state: LifecycleState::Stopped,
        }
    }

    /// Creates a lifecycle with the vector store, provider credential and
    /// embedding cache hooks, in that order.
    pub fn with_default_hooks(settings: Arc<Settings>) -> Self {
        Self::new(settings)
            .with_hook(VectorStoreHook)
            .with_hook(ProviderCredentialsHook)
            .with_hook(EmbeddingCacheHook)
    }

    /// Appends a hook.
    pub fn with_hook(mut self, hook: impl LifecycleHook + 'static) -> Self {
        self.hooks.push(Arc::new(hook));
        self
    }

    /// Returns the current state.
    #[inline]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Returns whether the application is running.
    #[inline]
    pub fn is_running(&self) -> bool {
        self.state == LifecycleState::Running
    }

    /// Returns the registered hook names in startup order.
    pub fn hook_names(&self) -> Vec<&'static str> {
        self.hooks.iter().map(|hook| hook.name()).collect()
    }

    /// Runs the startup hooks in registration order.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::AlreadyRunning`] if already started, or
    /// [`LifecycleError::Hook`] if a hook fails. In the latter case the hooks
    /// that already started are shut down in reverse order and the state
    /// stays [`LifecycleState::Stopped`].
    pub async fn start(&mut self) -> LifecycleResult<()> {
        if self.is_running() {
            return Err(LifecycleError::AlreadyRunning);
        }

        let settings = self.settings.as_ref();

        tracing::info!(
            target: TRACING_TARGET_LIFECYCLE,
            app_name = %settings.app_name,
            version = %settings.app_version,
            environment = %settings.environment,
            debug = settings.debug,
            "Starting application"
        );

        if settings.environment.is_production() && settings.uses_default_jwt_secret() {
            tracing::warn!(
                target: TRACING_TARGET_LIFECYCLE,
                "JWT_SECRET_KEY still has its placeholder value in production"
            );
        }

        for (index, hook) in self.hooks.iter().enumerate() {
            tracing::debug!(
                target: TRACING_TARGET_LIFECYCLE,
                hook = hook.name(),
                "Running startup hook"
            );

            if let Err(source) = hook.startup(settings).await {
                tracing::error!(
                    target: TRACING_TARGET_LIFECYCLE,
                    hook = hook.name(),
                    error = %source,
                    "Startup hook failed, rolling back"
                );

                run_shutdown_hooks(settings, &self.hooks[..index]).await;

                return Err(LifecycleError::Hook {
                    hook: hook.name(),
                    source,
                });
            }
        }

        self.state = LifecycleState::Running;

        tracing::info!(
            target: TRACING_TARGET_LIFECYCLE,
            hooks = self.hooks.len(),
            "Application started"
        );

        Ok(())
    }

    /// Runs the shutdown hooks in reverse registration order.
    ///
    /// Every hook runs even if an earlier one fails. The state is
    /// [`LifecycleState::Stopped`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleError::NotRunning`] if not started, or the first
    /// [`LifecycleError::Hook`] failure.
    pub async fn stop(&mut self) -> LifecycleResult<()> {
        if !self.is_running() {
            return Err(LifecycleError::NotRunning);
        }

        let settings = self.settings.as_ref();

        tracing::info!(
            target: TRACING_TARGET_LIFECYCLE,
            app_name = %settings.app_name,
            "Shutting down application"
        );

        let first_error = run_shutdown_hooks(settings, &self.hooks).await;
        self.state = LifecycleState::Stopped;

        match first_error {
            Some(error) => Err(error),
            None => {
                tracing::info!(target: TRACING_TARGET_LIFECYCLE, "Application stopped");
                Ok(())
            }
        }
    }
}

/// Runs `shutdown` on the given hooks in reverse order.
///
/// Returns the first failure; later hooks still run.
async fn run_shutdown_hooks(
    settings: &Settings,
    hooks: &[Arc<dyn LifecycleHook>],
) -> Option<LifecycleError> {
    let mut first_error = None;

    for hook in hooks.iter().rev() {
        tracing::debug!(
            target: TRACING_TARGET_LIFECYCLE,
            hook = hook.name(),
            "Running shutdown hook"
        );

        if let Err(source) = hook.shutdown(settings).await {
            tracing::error!(
                target: TRACING_TARGET_LIFECYCLE,
                hook = hook.name(),
                error = %source,
                "Shutdown hook failed"
            );

            first_error.get_or_insert(LifecycleError::Hook {
                hook: hook.name(),
                source,
            });
        }
    }

    first_error
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::config::SettingsLoader;

    type Events = Arc<Mutex<Vec<String>>>;

    struct RecordingHook {
        name: &'static str,
        events: Events,
        fail_startup: bool,
        fail_shutdown: bool,
    }

    impl RecordingHook {
        fn new(name: &'static str, events: &Events) -> Self {
            Self {
                name,
                events: Arc::clone(events),
                fail_startup: false,
                fail_shutdown: false,
            }
        }

        fn record(&self, phase: &str) {
            self.events
                .lock()
                .expect("events lock poisoned")
                .push(format!("{phase}:{}", self.name));
        }
    }

    #[async_trait]
    impl LifecycleHook for RecordingHook {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn startup(&self, _settings: &Settings) -> Result<(), BoxedError> {
            self.record("start");
            if self.fail_startup {
                return Err(format!("{} unavailable", self.name).into());
            }
            Ok(())
        }

        async fn shutdown(&self, _settings: &Settings) -> Result<(), BoxedError> {
            self.record("stop");
            if self.fail_shutdown {
                return Err(format!("{} refused to close", self.name).into());
            }
            Ok(())
        }
    }

    fn settings() -> Arc<Settings> {
        let settings = SettingsLoader::new()
            .without_env_file()
            .with_vars([("OPENAI_API_KEY", "sk-test")])
            .load()
            .expect("settings should load");
        Arc::new(settings)
    }

    fn events(events: &Events) -> Vec<String> {
        events.lock().expect("events lock poisoned").clone()
    }

    #[tokio::test]
    async fn hooks_run_in_order_and_reverse() -> anyhow::Result<()> {
        let log = Events::default();
        let mut lifecycle = Lifecycle::new(settings())
            .with_hook(RecordingHook::new("a", &log))
            .with_hook(RecordingHook::new("b", &log))
            .with_hook(RecordingHook::new("c", &log));

        lifecycle.start().await?;
        assert_eq!(lifecycle.state(), LifecycleState::Running);

        lifecycle.stop().await?;
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);

        assert_eq!(
            events(&log),
            ["start:a", "start:b", "start:c", "stop:c", "stop:b", "stop:a"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn double_start_and_stop_fail() -> anyhow::Result<()> {
        let mut lifecycle = Lifecycle::new(settings());

        assert!(matches!(
            lifecycle.stop().await,
            Err(LifecycleError::NotRunning)
        ));

        lifecycle.start().await?;
        assert!(matches!(
            lifecycle.start().await,
            Err(LifecycleError::AlreadyRunning)
        ));
        assert!(lifecycle.is_running());

        lifecycle.stop().await?;
        assert!(matches!(
            lifecycle.stop().await,
            Err(LifecycleError::NotRunning)
        ));
        Ok(())
    }

    #[tokio::test]
    async fn failed_startup_rolls_back() {
        let log = Events::default();
        let mut failing = RecordingHook::new("b", &log);
        failing.fail_startup = true;

        let mut lifecycle = Lifecycle::new(settings())
            .with_hook(RecordingHook::new("a", &log))
            .with_hook(failing)
            .with_hook(RecordingHook::new("c", &log));

        let error = lifecycle.start().await.unwrap_err();
        assert!(matches!(error, LifecycleError::Hook { hook: "b", .. }));
        assert_eq!(error.to_string(), "b hook failed: b unavailable");
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);

        assert_eq!(events(&log), ["start:a", "start:b", "stop:a"]);
    }

    #[tokio::test]
    async fn failed_shutdown_hook_does_not_stop_others() -> anyhow::Result<()> {
        let log = Events::default();
        let mut failing = RecordingHook::new("b", &log);
        failing.fail_shutdown = true;

        let mut lifecycle = Lifecycle::new(settings())
            .with_hook(RecordingHook::new("a", &log))
            .with_hook(failing)
            .with_hook(RecordingHook::new("c", &log));

        lifecycle.start().await?;
        let error = lifecycle.stop().await.unwrap_err();

        assert!(matches!(error, LifecycleError::Hook { hook: "b", .. }));
        assert_eq!(lifecycle.state(), LifecycleState::Stopped);
        assert_eq!(
            events(&log),
            ["start:a", "start:b", "start:c", "stop:c", "stop:b", "stop:a"]
        );
        Ok(())
    }

    #[tokio::test]
    async fn default_hooks_start_and_stop() -> anyhow::Result<()> {
        let mut lifecycle = Lifecycle::with_default_hooks(settings());
        assert_eq!(
            lifecycle.hook_names(),
            ["vector_store", "provider_credentials", "embedding_cache"]
        );

        lifecycle.start().await?;
        lifecycle.stop().await?;
        Ok(())
    }

    #[test]
    fn state_displays_lowercase() {
        assert_eq!(LifecycleState::Running.to_string(), "running");
        assert_eq!(LifecycleState::default().as_ref(), "stopped");
    }
}
