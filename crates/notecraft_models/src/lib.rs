//! Provider clients for notecraft.
//!
//! Text generation:
//! - [`OpenAICompatibleClient`] for DeepSeek, Doubao and any other endpoint
//!   serving `POST /chat/completions`
//!
//! Image generation:
//! - [`DashScopeImageClient`] for Tongyi Wanxiang (submit, poll, download)
//! - [`VolcengineImageClient`] for Jimeng (HMAC-signed submit and poll)
//!
//! Every client owns a lazily created HTTP session and routes each request
//! through the shared [`RetryPolicy`](notecraft_retry::RetryPolicy).
//! [`ProviderRegistry`] builds clients from configuration by name.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dashscope;
mod openai_compat;
mod registry;
mod session;
mod volcengine;

pub use dashscope::{
    DashScopeImageClient, SynthesisInput, SynthesisParameters, SynthesisRequest, TaskOutput,
    TaskResponse, TaskResult, TaskStatus,
};
pub use openai_compat::{
    ChatChoice, ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse,
    ChatMessage, ChatRole, OpenAICompatibleClient,
};
pub use registry::ProviderRegistry;
pub use session::HttpSession;
pub use volcengine::{
    Credentials, ResultData, ResultRequest, SignedHeaders, SubmitData, SubmitRequest,
    VisualResponse, VolcengineImageClient, canonical_query,
};
