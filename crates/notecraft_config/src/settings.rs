//! Typed configuration and the layered loader.

use crate::PromptTemplates;
use config::{Config, Environment, File, FileFormat};
use notecraft_core::ScriptFilter;
use notecraft_error::{ConfigError, NotecraftError, NotecraftResult};
use notecraft_retry::RetrySettings;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../notecraft.toml");

/// Wire protocol a provider speaks.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProviderApi {
    /// `POST {base_url}/chat/completions`
    OpenaiCompatible,
    /// Alibaba DashScope asynchronous text-to-image
    Dashscope,
    /// Volcengine visual API (signed requests)
    Volcengine,
}

/// What a provider can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Capability {
    /// Text from a prompt
    Text,
    /// An image from a prompt
    Image,
}

impl ProviderApi {
    /// The capability this protocol offers.
    pub fn capability(&self) -> Capability {
        match self {
            ProviderApi::OpenaiCompatible => Capability::Text,
            ProviderApi::Dashscope | ProviderApi::Volcengine => Capability::Image,
        }
    }
}

/// One `[providers.<name>]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Wire protocol
    pub api: ProviderApi,
    /// Endpoint root
    pub base_url: String,
    /// API key (the access key for Volcengine)
    #[serde(default)]
    pub api_key: String,
    /// Secret key, required by Volcengine
    #[serde(default)]
    pub secret_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Attempt cap for the retry policy
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// Wait between polls of an asynchronous image task
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Poll budget for an asynchronous image task
    #[serde(default)]
    pub max_polls: Option<usize>,
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

fn default_poll_interval_ms() -> u64 {
    2000
}

impl ProviderConfig {
    /// Checks the credentials the provider's protocol needs.
    pub fn check_credentials(&self, name: &str) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::new(format!(
                "providers.{}.api_key is not set (or set NOTECRAFT_PROVIDERS__{}__API_KEY)",
                name,
                name.to_uppercase()
            )));
        }
        if self.api == ProviderApi::Volcengine
            && self.secret_key.as_deref().is_none_or(|s| s.trim().is_empty())
        {
            return Err(ConfigError::new(format!(
                "providers.{}.secret_key is required for the volcengine api",
                name
            )));
        }
        Ok(())
    }

    fn redacted(&self) -> Self {
        let mask = |s: &str| {
            if s.is_empty() {
                String::new()
            } else {
                "********".to_string()
            }
        };
        Self {
            api_key: mask(&self.api_key),
            secret_key: self.secret_key.as_deref().map(mask),
            ..self.clone()
        }
    }
}

/// `[output]`: where notes, images and logs are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Note JSON files
    pub content_dir: PathBuf,
    /// Image files
    pub image_dir: PathBuf,
    /// Log files
    pub log_dir: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("./output/content"),
            image_dir: PathBuf::from("./output/images"),
            log_dir: PathBuf::from("./logs"),
        }
    }
}

/// `[generation]`: defaults used when a command leaves a value out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Category used when none is given
    pub default_category: String,
    /// Style label used when none is given
    pub default_style: String,
    /// Topics generated per request
    pub default_topic_count: usize,
    /// Images generated per note
    pub default_image_count: usize,
    /// Text provider for topics and content
    pub content_provider: String,
    /// Image provider; empty disables images
    #[serde(default)]
    pub image_provider: String,
    /// Characters kept from titles embedded in image prompts
    #[serde(default)]
    pub script_filter: ScriptFilter,
    /// Extra attempts for a failed batch item
    #[serde(default)]
    pub item_retries: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            default_category: "生活方式".to_string(),
            default_style: "生活分享".to_string(),
            default_topic_count: 5,
            default_image_count: 1,
            content_provider: "deepseek".to_string(),
            image_provider: "jimeng".to_string(),
            script_filter: ScriptFilter::Han,
            item_retries: 0,
        }
    }
}

/// `[web]`: listener for the form interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebConfig {
    /// Bind address
    pub host: String,
    /// Port
    pub port: u16,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
        }
    }
}

/// Complete notecraft configuration.
///
/// # Example
///
/// ```
/// use notecraft_config::NotecraftConfig;
///
/// let config = NotecraftConfig::bundled()?;
/// assert!(config.providers.contains_key("deepseek"));
/// assert_eq!(config.web.port, 8501);
/// # Ok::<(), notecraft_error::NotecraftError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotecraftConfig {
    /// Provider sections by name
    #[serde(default)]
    pub providers: BTreeMap<String, ProviderConfig>,
    /// Backoff bounds
    #[serde(default)]
    pub retry: RetrySettings,
    /// Prompt templates
    pub prompts: PromptTemplates,
    /// Output locations
    #[serde(default)]
    pub output: OutputConfig,
    /// Generation defaults
    #[serde(default)]
    pub generation: GenerationConfig,
    /// Web interface
    #[serde(default)]
    pub web: WebConfig,
}

impl NotecraftConfig {
    /// The bundled defaults alone.
    pub fn bundled() -> NotecraftResult<Self> {
        Self::from_toml_str(DEFAULT_CONFIG)
    }

    /// Parses and validates a TOML document, without any layering.
    pub fn from_toml_str(toml: &str) -> NotecraftResult<Self> {
        let builder = Config::builder().add_source(File::from_str(toml, FileFormat::Toml));
        Self::finish(builder)
    }

    /// Bundled defaults overlaid with a single file.
    pub fn from_file(path: impl AsRef<Path>) -> NotecraftResult<Self> {
        debug!(path = %path.as_ref().display(), "Loading configuration from file");
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from(path.as_ref()).format(FileFormat::Toml));
        Self::finish(builder)
    }

    /// Loads configuration with precedence:
    /// environment > explicit path (or `./notecraft.toml`) > home directory > bundled defaults.
    pub fn load(path: Option<&Path>) -> NotecraftResult<Self> {
        debug!("Loading configuration with precedence: env > file > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(config_dir) = dirs::config_dir() {
            let home_config = config_dir.join("notecraft").join("notecraft.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = match path {
            Some(path) => {
                info!(path = %path.display(), "Using configuration file");
                builder.add_source(File::from(path).format(FileFormat::Toml))
            }
            None => builder.add_source(File::with_name("notecraft").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("NOTECRAFT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> NotecraftResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| {
                NotecraftError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                NotecraftError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks templates, output paths, backoff bounds and the default providers.
    ///
    /// Credentials are checked separately, when a provider is instantiated,
    /// so commands that never touch a provider work without keys.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.prompts.validate()?;

        for (key, dir) in [
            ("content_dir", &self.output.content_dir),
            ("image_dir", &self.output.image_dir),
        ] {
            if dir.as_os_str().is_empty() {
                return Err(ConfigError::new(format!("output.{} must not be empty", key)));
            }
        }

        if self.retry.min_delay_ms > self.retry.max_delay_ms {
            return Err(ConfigError::new(format!(
                "retry.min_delay_ms ({}) exceeds retry.max_delay_ms ({})",
                self.retry.min_delay_ms, self.retry.max_delay_ms
            )));
        }

        for (name, provider) in &self.providers {
            if provider.base_url.trim().is_empty() {
                return Err(ConfigError::new(format!(
                    "providers.{}.base_url must not be empty",
                    name
                )));
            }
            if provider.model.trim().is_empty() {
                return Err(ConfigError::new(format!(
                    "providers.{}.model must not be empty",
                    name
                )));
            }
        }

        self.provider_with(&self.generation.content_provider, Capability::Text)?;
        if !self.generation.image_provider.is_empty() {
            self.provider_with(&self.generation.image_provider, Capability::Image)?;
        }
        Ok(())
    }

    /// Looks up a provider section, checking that it offers `capability`.
    pub fn provider_with(
        &self,
        name: &str,
        capability: Capability,
    ) -> Result<&ProviderConfig, ConfigError> {
        let provider = self.providers.get(name).ok_or_else(|| {
            ConfigError::new(format!(
                "Unknown provider '{}' (configured: {})",
                name,
                self.providers.keys().cloned().collect::<Vec<_>>().join(", ")
            ))
        })?;
        if provider.api.capability() != capability {
            return Err(ConfigError::new(format!(
                "Provider '{}' uses the {} api, which cannot generate {}",
                name, provider.api, capability
            )));
        }
        Ok(provider)
    }

    /// Names of providers offering `capability`.
    pub fn providers_with(&self, capability: Capability) -> Vec<&str> {
        self.providers
            .iter()
            .filter(|(_, p)| p.api.capability() == capability)
            .map(|(name, _)| name.as_str())
            .collect()
    }

    /// The configuration as TOML, with keys masked.
    pub fn to_redacted_toml(&self) -> NotecraftResult<String> {
        let mut shown = self.clone();
        for provider in shown.providers.values_mut() {
            *provider = provider.redacted();
        }
        toml::to_string_pretty(&shown).map_err(|e| {
            NotecraftError::from(ConfigError::new(format!(
                "Failed to render configuration: {}",
                e
            )))
        })
    }
}
