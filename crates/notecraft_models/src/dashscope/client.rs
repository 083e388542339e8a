//! Asynchronous DashScope image client.

use crate::dashscope::{
    SynthesisInput, SynthesisParameters, SynthesisRequest, TaskResponse, TaskStatus,
};
use crate::session::{ApiKey, HttpSession, read_json, transport_error};
use async_trait::async_trait;
use notecraft_config::ProviderConfig;
use notecraft_core::{GeneratedImage, ImageParams};
use notecraft_error::{NotecraftResult, ProviderError, ProviderErrorKind};
use notecraft_interface::{ImageGeneration, Provider};
use notecraft_retry::RetryPolicy;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

const DEFAULT_MAX_POLLS: usize = 30;

/// Image client for DashScope's asynchronous text-to-image API.
///
/// A generation is a submitted task that is polled until it succeeds or
/// fails; the first result URL is then downloaded.
#[derive(Debug)]
pub struct DashScopeImageClient {
    name: String,
    base_url: String,
    api_key: ApiKey,
    model: String,
    poll_interval: Duration,
    max_polls: usize,
    session: HttpSession,
    retry: RetryPolicy,
}

impl DashScopeImageClient {
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
        Ok(Self {
            name,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: ApiKey::new(config.api_key.clone()),
            model: config.model.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_polls: config.max_polls.unwrap_or(DEFAULT_MAX_POLLS).max(1),
            session: HttpSession::new(Duration::from_secs(config.timeout_secs)),
            retry,
        })
    }

    async fn submit(&self, request: &SynthesisRequest) -> NotecraftResult<TaskResponse> {
        let url = format!("{}/services/aigc/text2image/image-synthesis", self.base_url);
        let response = self
            .session
            .client()?
            .post(url)
            .bearer_auth(self.api_key.as_str())
            .header("X-DashScope-Async", "enable")
            .json(request)
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }

    async fn fetch_task(&self, task_id: &str) -> NotecraftResult<TaskResponse> {
        let url = format!("{}/tasks/{}", self.base_url, task_id);
        let response = self
            .session
            .client()?
            .get(url)
            .bearer_auth(self.api_key.as_str())
            .send()
            .await
            .map_err(transport_error)?;
        read_json(response).await
    }

    async fn wait_for_url(&self, task_id: &str) -> NotecraftResult<String> {
        for poll in 1..=self.max_polls {
            let task = self
                .retry
                .execute("dashscope_task", || self.fetch_task(task_id))
                .await?;
            let output = task.output();
            debug!(task_id, poll, status = ?output.task_status(), "Polled image task");

            match output.task_status() {
                TaskStatus::Succeeded => {
                    return output
                        .results()
                        .iter()
                        .find_map(|r| r.url().clone())
                        .ok_or_else(|| {
                            ProviderError::new(ProviderErrorKind::MalformedResponse(format!(
                                "Task {} succeeded without an image URL",
                                task_id
                            )))
                            .into()
                        });
                }
                TaskStatus::Failed | TaskStatus::Canceled => {
                    let reason = output
                        .message()
                        .clone()
                        .or_else(|| output.code().clone())
                        .unwrap_or_else(|| format!("{:?}", output.task_status()));
                    return Err(ProviderError::new(ProviderErrorKind::TaskFailed(format!(
                        "task {}: {}",
                        task_id, reason
                    )))
                    .into());
                }
                TaskStatus::Unknown => {
                    warn!(task_id, "Unrecognized task status, continuing to poll");
                }
                TaskStatus::Pending | TaskStatus::Running => {}
            }
            tokio::time::sleep(self.poll_interval).await;
        }

        Err(ProviderError::new(ProviderErrorKind::TaskTimedOut {
            task_id: task_id.to_string(),
            polls: self.max_polls,
        })
        .into())
    }
}

#[async_trait]
impl Provider for DashScopeImageClient {
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
impl ImageGeneration for DashScopeImageClient {
    #[instrument(skip(self, prompt), fields(provider = %self.name, width = params.width, height = params.height))]
    async fn generate_image(
        &self,
        prompt: &str,
        params: &ImageParams,
    ) -> NotecraftResult<GeneratedImage> {
        let request = SynthesisRequest {
            model: self.model.clone(),
            input: SynthesisInput {
                prompt: prompt.to_string(),
            },
            parameters: SynthesisParameters {
                size: format!("{}*{}", params.width, params.height),
                n: 1,
                seed: params.seed,
            },
        };

        let submitted = self
            .retry
            .execute("dashscope_submit", || self.submit(&request))
            .await?;
        let task_id = submitted.output().task_id().clone();
        info!(task_id = %task_id, "Submitted image task");

        let url = self.wait_for_url(&task_id).await?;
        self.retry
            .execute("dashscope_download", || self.session.download(&url))
            .await
    }
}
