//! Lazily created, explicitly released HTTP session.

use notecraft_core::GeneratedImage;
use notecraft_error::{NotecraftResult, ProviderError, ProviderErrorKind};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, error, instrument};

/// Longest response body excerpt kept in an error message.
const ERROR_BODY_LIMIT: usize = 500;

/// A pooled `reqwest::Client` that is built on first use.
///
/// Clones of the inner client share one connection pool, so handing out
/// clones to concurrent requests is cheap. [`HttpSession::release`] drops
/// the pool; the next request builds a new one.
#[derive(Debug)]
pub struct HttpSession {
    timeout: Duration,
    client: Mutex<Option<Client>>,
}

impl HttpSession {
    /// Creates a session whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: Mutex::new(None),
        }
    }

    /// Returns the pooled client, building it if needed.
    pub fn client(&self) -> NotecraftResult<Client> {
        let mut slot = self.client.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }
        debug!(timeout_secs = self.timeout.as_secs(), "Opening HTTP session");
        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| {
                ProviderError::new(ProviderErrorKind::Network(format!(
                    "Failed to build HTTP client: {}",
                    e
                )))
            })?;
        *slot = Some(client.clone());
        Ok(client)
    }

    /// Drops the pooled client.
    pub fn release(&self) {
        let mut slot = self.client.lock().unwrap_or_else(|p| p.into_inner());
        if slot.take().is_some() {
            debug!("Released HTTP session");
        }
    }

    /// Whether a client is currently pooled.
    pub fn is_open(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(|p| p.into_inner())
            .is_some()
    }

    /// Fetches generated media from `url`.
    #[instrument(skip(self))]
    pub async fn download(&self, url: &str) -> NotecraftResult<GeneratedImage> {
        let response = self
            .client()?
            .get(url)
            .send()
            .await
            .map_err(transport_error)?;
        let response = check_status(response).await?;
        let bytes = response.bytes().await.map_err(transport_error)?;
        if bytes.is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::Download(format!(
                "{} returned an empty body",
                url
            )))
            .into());
        }
        debug!(bytes = bytes.len(), "Downloaded image");
        Ok(GeneratedImage::new(bytes.to_vec(), Some(url.to_string())))
    }
}

/// Classifies a `reqwest` failure as transient or terminal.
pub(crate) fn transport_error(e: reqwest::Error) -> ProviderError {
    error!(error = ?e, "HTTP request failed");
    let kind = if e.is_timeout() {
        ProviderErrorKind::Timeout(e.to_string())
    } else if e.is_decode() {
        ProviderErrorKind::MalformedResponse(e.to_string())
    } else if e.is_builder() {
        ProviderErrorKind::InvalidRequest(e.to_string())
    } else if let Some(status) = e.status() {
        ProviderErrorKind::Http {
            status_code: status.as_u16(),
            message: e.to_string(),
        }
    } else {
        ProviderErrorKind::Network(e.to_string())
    };
    ProviderError::new(kind)
}

/// Passes successful responses through and turns the rest into `Http` errors.
pub(crate) async fn check_status(response: Response) -> NotecraftResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!(status = %status, error = %body, "API error");
    let mut message: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    if message.is_empty() {
        message = status.canonical_reason().unwrap_or("no body").to_string();
    }
    Err(ProviderError::new(ProviderErrorKind::Http {
        status_code: status.as_u16(),
        message,
    })
    .into())
}

/// Checks the status, then decodes the body as JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response) -> NotecraftResult<T> {
    let response = check_status(response).await?;
    let bytes = response.bytes().await.map_err(transport_error)?;
    serde_json::from_slice(&bytes).map_err(|e| {
        error!(error = ?e, body = %String::from_utf8_lossy(&bytes), "Failed to parse JSON");
        ProviderError::new(ProviderErrorKind::MalformedResponse(format!(
            "Failed to parse response JSON: {}",
            e
        )))
        .into()
    })
}

/// Bearer token that never appears in `Debug` output.
#[derive(Clone)]
pub(crate) struct ApiKey(String);

impl ApiKey {
    pub(crate) fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(********)")
    }
}
