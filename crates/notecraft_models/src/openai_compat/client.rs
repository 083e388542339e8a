//! Chat completion client.

use crate::openai_compat::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ChatRole,
};
use crate::session::{ApiKey, HttpSession, read_json, transport_error};
use async_trait::async_trait;
use notecraft_config::ProviderConfig;
use notecraft_core::TextParams;
use notecraft_error::{NotecraftResult, ProviderError, ProviderErrorKind};
use notecraft_interface::{Provider, TextGeneration};
use notecraft_retry::RetryPolicy;
use std::time::Duration;
use tracing::{debug, instrument};

/// Client for any endpoint speaking the OpenAI chat completion protocol.
///
/// DeepSeek and Doubao both expose this protocol, differing only in base
/// URL, key and model name.
#[derive(Debug)]
pub struct OpenAICompatibleClient {
    name: String,
    base_url: String,
    api_key: ApiKey,
    model: String,
    session: HttpSession,
    retry: RetryPolicy,
}

impl OpenAICompatibleClient {
    /// Creates a client from a provider section.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the API key is missing.
    pub fn new(
        name: impl Into<String>,
        config: &ProviderConfig,
        retry: RetryPolicy,
    ) -> NotecraftResult<Self> {
        let name = name.into();
        config.check_credentials(&name)?;
        debug!(provider = %name, model = %config.model, "Created chat completion client");
        Ok(Self {
            name,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: ApiKey::new(config.api_key.clone()),
            model: config.model.clone(),
            session: HttpSession::new(Duration::from_secs(config.timeout_secs)),
            retry,
        })
    }

    /// Whether a network session is currently open.
    pub fn session_open(&self) -> bool {
        self.session.is_open()
    }

    fn build_request(&self, prompt: &str, params: &TextParams) -> NotecraftResult<ChatCompletionRequest> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = params.system_prompt.as_deref().filter(|s| !s.is_empty()) {
            messages.push(ChatMessage::new(ChatRole::System, system));
        }
        messages.push(ChatMessage::new(ChatRole::User, prompt));

        ChatCompletionRequest::builder()
            .model(self.model.clone())
            .messages(messages)
            .temperature(params.temperature)
            .max_tokens(params.max_tokens)
            .top_p(params.top_p)
            .build()
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::InvalidRequest(format!(
                    "Failed to build chat request: {}",
                    e
                )))
                .into()
            })
    }

    async fn send(&self, url: &str, request: &ChatCompletionRequest) -> NotecraftResult<ChatCompletionResponse> {
        let response = self
            .session
            .client()?
            .post(url)
            .bearer_auth(self.api_key.as_str())
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }
}

#[async_trait]
impl Provider for OpenAICompatibleClient {
    fn provider_name(&self) -> &str {
        &self.name
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    async fn release(&self) {
        self.session.release();
    }
}

#[async_trait]
impl TextGeneration for OpenAICompatibleClient {
    #[instrument(skip(self, prompt, params), fields(provider = %self.name, model = %self.model, prompt_len = prompt.len()))]
    async fn generate_text(&self, prompt: &str, params: &TextParams) -> NotecraftResult<String> {
        let request = self.build_request(prompt, params)?;
        let url = format!("{}/chat/completions", self.base_url);

        let response = self
            .retry
            .execute("chat_completion", || self.send(&url, &request))
            .await?;

        let text = response
            .choices()
            .first()
            .map(|choice| choice.message().content().trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::MalformedResponse(
                    "Response contained no completion text".to_string(),
                ))
            })?;

        debug!(response_len = text.len(), "Received completion");
        Ok(text)
    }
}
