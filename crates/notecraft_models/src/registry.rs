//! Builds provider clients from configuration.

use crate::{DashScopeImageClient, OpenAICompatibleClient, VolcengineImageClient};
use notecraft_config::{Capability, NotecraftConfig, ProviderApi, ProviderConfig};
use notecraft_error::{ConfigError, NotecraftResult};
use notecraft_interface::{ImageGeneration, ProviderCatalog, TextGeneration};
use notecraft_retry::RetryPolicy;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, instrument};

/// Hands out shared provider clients by configured name.
///
/// Clients are created on first request and cached, so every caller asking
/// for the same provider shares one network session. Unknown providers,
/// capability mismatches and missing credentials are configuration errors,
/// reported before any request is sent.
///
/// # Example
///
/// ```
/// use notecraft_config::NotecraftConfig;
/// use notecraft_models::ProviderRegistry;
///
/// let config = NotecraftConfig::bundled()?;
/// let registry = ProviderRegistry::new(&config);
///
/// // The bundled configuration ships without API keys.
/// assert!(registry.text("deepseek").is_err());
/// # Ok::<(), notecraft_error::NotecraftError>(())
/// ```
pub struct ProviderRegistry {
    config: NotecraftConfig,
    text: Mutex<HashMap<String, Arc<dyn TextGeneration>>>,
    image: Mutex<HashMap<String, Arc<dyn ImageGeneration>>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.config.providers.keys().collect::<Vec<_>>())
            .field("retry", &self.config.retry)
            .finish()
    }
}

impl ProviderRegistry {
    /// Creates a registry over the configured provider sections.
    pub fn new(config: &NotecraftConfig) -> Self {
        Self {
            config: config.clone(),
            text: Mutex::new(HashMap::new()),
            image: Mutex::new(HashMap::new()),
        }
    }

    fn section(&self, name: &str, capability: Capability) -> Result<&ProviderConfig, ConfigError> {
        self.config.provider_with(name, capability)
    }

    /// Text provider `name`.
    #[instrument(skip(self))]
    pub fn text(&self, name: &str) -> NotecraftResult<Arc<dyn TextGeneration>> {
        let mut cache = self.text.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(client) = cache.get(name) {
            return Ok(Arc::clone(client));
        }

        let section = self.section(name, Capability::Text)?;
        let retry = RetryPolicy::from_settings(&self.config.retry, section.max_retries);
        let client: Arc<dyn TextGeneration> =
            Arc::new(OpenAICompatibleClient::new(name, section, retry)?);
        debug!(provider = name, "Registered text provider");
        cache.insert(name.to_string(), Arc::clone(&client));
        Ok(client)
    }

    /// Image provider `name`.
    #[instrument(skip(self))]
    pub fn image(&self, name: &str) -> NotecraftResult<Arc<dyn ImageGeneration>> {
        let mut cache = self.image.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(client) = cache.get(name) {
            return Ok(Arc::clone(client));
        }

        let section = self.section(name, Capability::Image)?;
        let retry = RetryPolicy::from_settings(&self.config.retry, section.max_retries);
        let client: Arc<dyn ImageGeneration> = match section.api {
            ProviderApi::Dashscope => Arc::new(DashScopeImageClient::new(name, section, retry)?),
            ProviderApi::Volcengine => Arc::new(VolcengineImageClient::new(name, section, retry)?),
            ProviderApi::OpenaiCompatible => {
                return Err(ConfigError::new(format!(
                    "Provider '{}' cannot generate images",
                    name
                ))
                .into());
            }
        };
        debug!(provider = name, "Registered image provider");
        cache.insert(name.to_string(), Arc::clone(&client));
        Ok(client)
    }

    /// Releases the network session of every client created so far.
    pub async fn release_all(&self) {
        let text: Vec<_> = self
            .text
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .values()
            .cloned()
            .collect();
        let image: Vec<_> = self
            .image
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .values()
            .cloned()
            .collect();
        for client in text {
            client.release().await;
        }
        for client in image {
            client.release().await;
        }
    }
}

#[async_trait::async_trait]
impl ProviderCatalog for ProviderRegistry {
    fn text(&self, name: &str) -> NotecraftResult<Arc<dyn TextGeneration>> {
        ProviderRegistry::text(self, name)
    }

    fn image(&self, name: &str) -> NotecraftResult<Arc<dyn ImageGeneration>> {
        ProviderRegistry::image(self, name)
    }

    async fn release_all(&self) {
        ProviderRegistry::release_all(self).await;
    }
}
