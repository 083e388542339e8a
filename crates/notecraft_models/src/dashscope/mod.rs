//! Alibaba DashScope text-to-image (Tongyi Wanxiang).

mod client;
mod dto;

pub use client::DashScopeImageClient;
pub use dto::{
    SynthesisInput, SynthesisParameters, SynthesisRequest, TaskOutput, TaskResponse, TaskResult,
    TaskStatus,
};
