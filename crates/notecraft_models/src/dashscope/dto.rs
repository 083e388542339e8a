//! DashScope image synthesis data transfer objects.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Prompt section of a synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisInput {
    /// Image description
    pub prompt: String,
}

/// Generation parameters of a synthesis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisParameters {
    /// Output size as `"{width}*{height}"`
    pub size: String,
    /// Number of images
    pub n: u32,
    /// Fixed seed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
}

/// Body of `POST /services/aigc/text2image/image-synthesis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisRequest {
    /// Model identifier
    pub model: String,
    /// Prompt
    pub input: SynthesisInput,
    /// Size, count and seed
    pub parameters: SynthesisParameters,
}

/// Lifecycle state of an asynchronous task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Queued
    Pending,
    /// Generating
    Running,
    /// Finished with results
    Succeeded,
    /// Finished without results
    Failed,
    /// Cancelled by the service
    Canceled,
    /// Any state this client does not know
    #[serde(other)]
    Unknown,
}

/// One generated image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TaskResult {
    /// Download URL
    #[serde(default)]
    url: Option<String>,
    /// Per-image error code
    #[serde(default)]
    code: Option<String>,
    /// Per-image error message
    #[serde(default)]
    message: Option<String>,
}

/// The `output` object of submit and task responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TaskOutput {
    /// Task identifier
    task_id: String,
    /// Current state
    task_status: TaskStatus,
    /// Generated images, once succeeded
    #[serde(default)]
    results: Vec<TaskResult>,
    /// Error code, once failed
    #[serde(default)]
    code: Option<String>,
    /// Error message, once failed
    #[serde(default)]
    message: Option<String>,
}

/// Response of the submit and task endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct TaskResponse {
    /// Task state
    output: TaskOutput,
    /// Request identifier for support tickets
    #[serde(default)]
    request_id: Option<String>,
}
