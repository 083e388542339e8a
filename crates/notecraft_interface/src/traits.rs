//! Capability traits implemented by provider clients.

use async_trait::async_trait;
use notecraft_core::{GeneratedImage, ImageParams, TextParams};
use notecraft_error::NotecraftResult;
use std::sync::Arc;

/// Behaviour shared by every provider client.
#[async_trait]
pub trait Provider: Send + Sync {
    /// Configured provider name (e.g., "deepseek", "jimeng").
    fn provider_name(&self) -> &str;

    /// Model identifier sent with each request.
    fn model_name(&self) -> &str;

    /// Drops the pooled network session.
    ///
    /// The next request opens a fresh one.
    async fn release(&self) {}
}

/// Providers that turn a prompt into text.
#[async_trait]
pub trait TextGeneration: Provider {
    /// Generate text for `prompt`.
    async fn generate_text(&self, prompt: &str, params: &TextParams) -> NotecraftResult<String>;
}

/// Providers that turn a prompt into an image.
#[async_trait]
pub trait ImageGeneration: Provider {
    /// Generate one image for `prompt`.
    async fn generate_image(
        &self,
        prompt: &str,
        params: &ImageParams,
    ) -> NotecraftResult<GeneratedImage>;
}

/// Looks providers up by configured name.
///
/// The orchestrator resolves every provider through this seam, so a request
/// can name any configured provider without the caller knowing its api.
#[async_trait]
pub trait ProviderCatalog: Send + Sync {
    /// Text provider `name`.
    fn text(&self, name: &str) -> NotecraftResult<Arc<dyn TextGeneration>>;

    /// Image provider `name`.
    fn image(&self, name: &str) -> NotecraftResult<Arc<dyn ImageGeneration>>;

    /// Releases the network session of every provider handed out so far.
    async fn release_all(&self) {}
}
