//! Provider API error types and retry classification.

/// Provider-specific error conditions.
///
/// Variants split into two groups. Transient conditions (timeouts, dropped
/// connections, throttling and server-side failures) are retried by the
/// client's retry policy. Everything else is terminal and surfaces to the
/// calling generator immediately.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ProviderErrorKind {
    /// The request did not complete within the client timeout
    #[display("Request timed out: {}", _0)]
    Timeout(String),
    /// Connection-level failure before a response was received
    #[display("Network error: {}", _0)]
    Network(String),
    /// HTTP error with status code and message
    #[display("HTTP {} error: {}", status_code, message)]
    Http {
        /// HTTP status code
        status_code: u16,
        /// Error message (response body or reason)
        message: String,
    },
    /// The request could not be built or was rejected as malformed
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),
    /// The provider answered, but not in the expected shape
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
    /// An asynchronous generation task reported failure
    #[display("Generation task failed: {}", _0)]
    TaskFailed(String),
    /// An asynchronous generation task did not finish within the poll budget
    #[display("Generation task {} still pending after {} polls", task_id, polls)]
    TaskTimedOut {
        /// Provider task identifier
        task_id: String,
        /// Number of polls made
        polls: usize,
    },
    /// Generated media could not be fetched or decoded
    #[display("Image download failed: {}", _0)]
    Download(String),
    /// Every attempt allowed by the retry policy failed transiently
    #[display("Gave up after {} attempts: {}", attempts, last)]
    RetriesExhausted {
        /// Number of attempts made
        attempts: usize,
        /// Message of the final transient error
        last: String,
    },
}

impl ProviderErrorKind {
    /// Check if this error type should be retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderErrorKind::Http { status_code, .. } => {
                matches!(*status_code, 408 | 429 | 500 | 502 | 503 | 504)
            }
            ProviderErrorKind::Timeout(_) => true,
            ProviderErrorKind::Network(_) => true,
            _ => false,
        }
    }
}

/// Provider error with source location tracking.
///
/// # Examples
///
/// ```
/// use notecraft_error::{ProviderError, ProviderErrorKind, RetryableError};
///
/// let err = ProviderError::new(ProviderErrorKind::Http {
///     status_code: 401,
///     message: "invalid api key".to_string(),
/// });
/// assert!(!err.is_retryable());
/// assert!(err.is_terminal());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// True when the error will not go away by retrying.
    pub fn is_terminal(&self) -> bool {
        !self.kind.is_retryable()
    }
}

/// Trait for errors that support retry logic.
///
/// # Examples
///
/// ```
/// use notecraft_error::{ProviderError, ProviderErrorKind, RetryableError};
///
/// let err = ProviderError::new(ProviderErrorKind::Http {
///     status_code: 503,
///     message: "Service unavailable".to_string(),
/// });
///
/// assert!(err.is_retryable());
/// ```
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like 503 (service unavailable), 429 (rate limit),
    /// or network timeouts should return true. Permanent errors like 401
    /// (unauthorized) or 400 (bad request) should return false.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
