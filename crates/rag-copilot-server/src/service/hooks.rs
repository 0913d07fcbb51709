//! Built-in lifecycle hooks.
//!
//! These hooks are the attachment points for the vector store, the model
//! provider and the embedding cache. Until those collaborators exist they
//! only report what they would prepare or release.

use async_trait::async_trait;

use crate::config::Settings;
use crate::service::lifecycle::{BoxedError, LifecycleHook};
use crate::utility::tracing_targets::TRACING_TARGET_LIFECYCLE;

/// Opens and closes the vector store connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct VectorStoreHook;

impl VectorStoreHook {
    fn backends(settings: &Settings) -> Vec<&'static str> {
        [
            settings.use_supabase.then_some("supabase"),
            settings.use_pinecone.then_some("pinecone"),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

#[async_trait]
impl LifecycleHook for VectorStoreHook {
    fn name(&self) -> &'static str {
        "vector_store"
    }

    async fn startup(&self, settings: &Settings) -> Result<(), BoxedError> {
        let backends = Self::backends(settings);
        if backends.is_empty() {
            tracing::warn!(
                target: TRACING_TARGET_LIFECYCLE,
                "No vector store backend is enabled"
            );
        }

        tracing::info!(
            target: TRACING_TARGET_LIFECYCLE,
            backends = ?backends,
            postgres_configured = settings.postgres_url().is_some(),
            "Vector store connection pending"
        );
        Ok(())
    }

    async fn shutdown(&self, _settings: &Settings) -> Result<(), BoxedError> {
        tracing::info!(target: TRACING_TARGET_LIFECYCLE, "Vector store connection closed");
        Ok(())
    }
}

/// Validates the model provider credentials.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProviderCredentialsHook;

#[async_trait]
impl LifecycleHook for ProviderCredentialsHook {
    fn name(&self) -> &'static str {
        "provider_credentials"
    }

    async fn startup(&self, settings: &Settings) -> Result<(), BoxedError> {
        tracing::info!(
            target: TRACING_TARGET_LIFECYCLE,
            model = %settings.openai_model,
            embedding_model = %settings.openai_embedding_model,
            "Provider credential validation pending"
        );
        Ok(())
    }

    async fn shutdown(&self, _settings: &Settings) -> Result<(), BoxedError> {
        Ok(())
    }
}

/// Warms up and releases the embedding cache.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddingCacheHook;

#[async_trait]
impl LifecycleHook for EmbeddingCacheHook {
    fn name(&self) -> &'static str {
        "embedding_cache"
    }

    async fn startup(&self, settings: &Settings) -> Result<(), BoxedError> {
        tracing::info!(
            target: TRACING_TARGET_LIFECYCLE,
            embedding_model = %settings.openai_embedding_model,
            chunk_size = settings.chunk_size,
            chunk_overlap = settings.chunk_overlap,
            "Embedding cache warm-up pending"
        );
        Ok(())
    }

    async fn shutdown(&self, _settings: &Settings) -> Result<(), BoxedError> {
        tracing::info!(target: TRACING_TARGET_LIFECYCLE, "Embedding cache released");
        Ok(())
    }
}
