//! Application state and dependency injection.

mod hooks;
mod lifecycle;

use std::sync::Arc;

pub use crate::service::hooks::{EmbeddingCacheHook, ProviderCredentialsHook, VectorStoreHook};
pub use crate::service::lifecycle::{
    BoxedError, Lifecycle, LifecycleError, LifecycleHook, LifecycleResult, LifecycleState,
};
use crate::config::Settings;

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection). Handlers only
/// ever read from it.
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    settings: Arc<Settings>,
}

impl ServiceState {
    /// Creates the application state around a loaded settings snapshot.
    pub fn new(settings: Arc<Settings>) -> Self {
        Self { settings }
    }

    /// Returns the settings snapshot.
    #[inline]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(settings: Arc<Settings>);
