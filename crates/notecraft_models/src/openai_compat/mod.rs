//! OpenAI-compatible chat completion providers (DeepSeek, Doubao, local servers).

mod client;
mod dto;

pub use client::OpenAICompatibleClient;
pub use dto::{
    ChatChoice, ChatCompletionRequest, ChatCompletionRequestBuilder, ChatCompletionResponse,
    ChatMessage, ChatRole,
};
