//! Retry and backoff for notecraft API clients.
//!
//! Every provider request runs through [`RetryPolicy::execute`]. Transient
//! failures (timeouts, connection drops, 408/429/5xx) are retried with
//! exponential backoff up to a fixed attempt cap; anything else fails on the
//! first attempt. When the cap is reached while the failure is still
//! transient, the caller receives a terminal
//! [`ProviderErrorKind::RetriesExhausted`](notecraft_error::ProviderErrorKind::RetriesExhausted).
//!
//! # Example
//!
//! ```
//! use notecraft_retry::RetryPolicy;
//! use std::time::Duration;
//!
//! let policy = RetryPolicy::default();
//! assert_eq!(policy.max_attempts(), 3);
//! assert_eq!(policy.delays(), vec![Duration::from_secs(4), Duration::from_secs(8)]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod policy;

pub use policy::{RetryPolicy, RetrySettings};
