//! Volcengine visual API data transfer objects.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Response code meaning success.
pub(crate) const CODE_OK: i64 = 10000;

/// Body of `CVSync2AsyncSubmitTask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Model selector
    pub req_key: String,
    /// Image description
    pub prompt: String,
    /// Let the service expand short prompts
    pub use_pre_llm: bool,
    /// Seed; -1 picks one at random
    pub seed: i64,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

/// Body of `CVSync2AsyncGetResult`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRequest {
    /// Model selector
    pub req_key: String,
    /// Task to query
    pub task_id: String,
    /// JSON-encoded result options
    pub req_json: String,
}

/// Envelope shared by every visual API response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct VisualResponse<T> {
    /// Business status code
    code: i64,
    /// Human-readable status
    #[serde(default)]
    message: String,
    /// Payload, present on success
    data: Option<T>,
    /// Request identifier for support tickets
    #[serde(default)]
    request_id: Option<String>,
}

impl<T> VisualResponse<T> {
    /// Consumes the envelope, returning its payload.
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Payload of a submit response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct SubmitData {
    /// Task identifier
    task_id: String,
}

/// Payload of a result query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ResultData {
    /// `in_queue`, `generating`, `done`, `not_found` or `expired`
    #[serde(default)]
    status: String,
    /// Inline images
    #[serde(default)]
    binary_data_base64: Option<Vec<String>>,
    /// Image URLs, when requested
    #[serde(default)]
    image_urls: Option<Vec<String>>,
}
