//! Signed, asynchronous Volcengine image client.

use crate::session::{HttpSession, read_json, transport_error};
use crate::volcengine::dto::CODE_OK;
use crate::volcengine::{
    Credentials, ResultData, ResultRequest, SubmitData, SubmitRequest, VisualResponse,
};
use async_trait::async_trait;
use base64::Engine;
use notecraft_config::ProviderConfig;
use notecraft_core::{GeneratedImage, ImageParams};
use notecraft_error::{ConfigError, NotecraftResult, ProviderError, ProviderErrorKind};
use notecraft_interface::{ImageGeneration, Provider};
use notecraft_retry::RetryPolicy;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const API_VERSION: &str = "2022-08-31";
const SUBMIT_ACTION: &str = "CVSync2AsyncSubmitTask";
const RESULT_ACTION: &str = "CVSync2AsyncGetResult";
const DEFAULT_MAX_POLLS: usize = 10;

/// Image client for the Volcengine visual API (Jimeng models).
///
/// Every call is a signed `POST /?Action=...&Version=...`. Generation is
/// submitted as a task and polled until the service reports `done`.
#[derive(Debug)]
pub struct VolcengineImageClient {
    name: String,
    endpoint: reqwest::Url,
    host: String,
    credentials: Credentials,
    model: String,
    poll_interval: Duration,
    max_polls: usize,
    session: HttpSession,
    retry: RetryPolicy,
}

impl VolcengineImageClient {
    /// Creates a client from a provider section.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when either key is missing or the base
    /// URL cannot be parsed.
    pub fn new(
        name: impl Into<String>,
        config: &ProviderConfig,
        retry: RetryPolicy,
    ) -> NotecraftResult<Self> {
        let name = name.into();
        config.check_credentials(&name)?;

        let endpoint = reqwest::Url::parse(&config.base_url).map_err(|e| {
            ConfigError::new(format!(
                "providers.{}.base_url '{}' is not a valid URL: {}",
                name, config.base_url, e
            ))
        })?;
        let host = match (endpoint.host_str(), endpoint.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => {
                return Err(ConfigError::new(format!(
                    "providers.{}.base_url '{}' has no host",
                    name, config.base_url
                ))
                .into());
            }
        };

        Ok(Self {
            name,
            endpoint,
            host,
            credentials: Credentials::new(
                config.api_key.clone(),
                config.secret_key.clone().unwrap_or_default(),
            ),
            model: config.model.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls.unwrap_or(DEFAULT_MAX_POLLS).max(1),
            session: HttpSession::new(Duration::from_secs(config.timeout_secs)),
            retry,
        })
    }

    /// Sends one signed action and unwraps the response envelope.
    async fn call<B, T>(&self, action: &str, body: &B) -> NotecraftResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let payload = serde_json::to_vec(body).map_err(|e| {
            ProviderError::new(ProviderErrorKind::InvalidRequest(format!(
                "Failed to encode {} body: {}",
                action, e
            )))
        })?;
        let query = [("Action", action), ("Version", API_VERSION)];
        let signed = self
            .credentials
            .sign(&self.host, &query, &payload, chrono::Utc::now())?;

        let mut url = self.endpoint.clone();
        url.set_path("/");
        url.set_query(Some(&crate::volcengine::canonical_query(&query)));

        let response = self
            .session
            .client()?
            .post(url)
            .header("Content-Type", "application/json")
            .header("Host", &self.host)
            .header("X-Date", &signed.x_date)
            .header("X-Content-Sha256", &signed.content_sha256)
            .header("Authorization", &signed.authorization)
            .body(payload)
            .send()
            .await
            .map_err(transport_error)?;

        let envelope: VisualResponse<T> = read_json(response).await?;
        if *envelope.code() != CODE_OK {
            return Err(ProviderError::new(classify_code(*envelope.code(), envelope.message())).into());
        }
        envelope.into_data().ok_or_else(|| {
            ProviderError::new(ProviderErrorKind::MalformedResponse(format!(
                "{} response has no data",
                action
            )))
            .into()
        })
    }

    async fn wait_for_image(&self, task_id: &str) -> NotecraftResult<GeneratedImage> {
        let request = ResultRequest {
            req_key: self.model.clone(),
            task_id: task_id.to_string(),
            req_json: r#"{"return_url":true}"#.to_string(),
        };

        for poll in 1..=self.max_polls {
            let data: ResultData = self
                .retry
                .execute("volcengine_result", || self.call(RESULT_ACTION, &request))
                .await?;
            debug!(task_id, poll, status = %data.status(), "Polled image task");

            match data.status().as_str() {
                "done" => return self.take_image(task_id, data).await,
                "in_queue" | "generating" => {}
                "" => warn!(task_id, "Task status missing, continuing to poll"),
                other => {
                    return Err(ProviderError::new(ProviderErrorKind::TaskFailed(format!(
                        "task {} ended with status '{}'",
                        task_id, other
                    )))
                    .into());
                }
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(ProviderError::new(ProviderErrorKind::TaskTimedOut {
            task_id: task_id.to_string(),
            polls: self.max_polls,
        })
        .into())
    }

    async fn take_image(&self, task_id: &str, data: ResultData) -> NotecraftResult<GeneratedImage> {
        if let Some(encoded) = data.binary_data_base64().as_ref().and_then(|v| v.first()) {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded)
                .map_err(|e| {
                    ProviderError::new(ProviderErrorKind::Download(format!(
                        "Invalid base64 image data: {}",
                        e
                    )))
                })?;
            debug!(task_id, bytes = bytes.len(), "Decoded inline image");
            return Ok(GeneratedImage::new(bytes, None));
        }

        match data.image_urls().as_ref().and_then(|v| v.first()) {
            Some(url) => {
                self.retry
                    .execute("volcengine_download", || self.session.download(url))
                    .await
            }
            None => Err(ProviderError::new(ProviderErrorKind::MalformedResponse(format!(
                "Task {} is done but returned no image",
                task_id
            )))
            .into()),
        }
    }
}

/// Maps a non-success business code to an error kind.
///
/// Throttling and internal-error codes are surfaced as the equivalent HTTP
/// status so the retry policy treats them as transient.
fn classify_code(code: i64, message: &str) -> ProviderErrorKind {
    let message = format!("code {}: {}", code, message);
    match code {
        50429 | 50430 => ProviderErrorKind::Http {
            status_code: 429,
            message,
        },
        50500 | 50501 | 50511 => ProviderErrorKind::Http {
            status_code: 500,
            message,
        },
        _ => ProviderErrorKind::TaskFailed(message),
    }
}

#[async_trait]
impl Provider for VolcengineImageClient {
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
impl ImageGeneration for VolcengineImageClient {
    #[instrument(skip(self, prompt), fields(provider = %self.name, width = params.width, height = params.height))]
    async fn generate_image(
        &self,
        prompt: &str,
        params: &ImageParams,
    ) -> NotecraftResult<GeneratedImage> {
        let request = SubmitRequest {
            req_key: self.model.clone(),
            prompt: prompt.to_string(),
            use_pre_llm: true,
            seed: params.seed.unwrap_or(-1),
            width: params.width,
            height: params.height,
        };

        let submitted: SubmitData = self
            .retry
            .execute("volcengine_submit", || self.call(SUBMIT_ACTION, &request))
            .await?;
        info!(task_id = %submitted.task_id(), "Submitted image task");

        self.wait_for_image(submitted.task_id()).await
    }
}
