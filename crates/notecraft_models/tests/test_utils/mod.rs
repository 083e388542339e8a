//! Shared fixtures for provider client tests.

#![allow(dead_code)]

use notecraft_config::{ProviderApi, ProviderConfig};
use notecraft_error::{NotecraftError, NotecraftErrorKind, ProviderErrorKind};
use notecraft_retry::RetryPolicy;
use std::time::Duration;

/// Provider section pointing at a mock server, with millisecond polling.
pub fn provider(api: ProviderApi, base_url: &str) -> ProviderConfig {
    ProviderConfig {
        api,
        base_url: base_url.to_string(),
        api_key: "ak-test".to_string(),
        secret_key: Some("sk-test".to_string()),
        model: "test-model".to_string(),
        timeout_secs: 5,
        max_retries: 3,
        poll_interval_ms: 1,
        max_polls: Some(3),
    }
}

/// Three attempts with millisecond waits.
pub fn fast_retry() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(1), Duration::from_millis(5))
}

/// The provider error kind inside `err`, if it is one.
pub fn provider_kind(err: &NotecraftError) -> Option<&ProviderErrorKind> {
    match err.kind() {
        NotecraftErrorKind::Provider(p) => Some(&p.kind),
        _ => None,
    }
}

/// Eight bytes of PNG signature.
pub const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";
