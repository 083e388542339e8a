//! Volcengine visual API (Jimeng text-to-image).

mod client;
mod dto;
mod signing;

pub use client::VolcengineImageClient;
pub use dto::{ResultData, ResultRequest, SubmitData, SubmitRequest, VisualResponse};
pub use signing::{Credentials, SignedHeaders, canonical_query};
