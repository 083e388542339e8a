//! Top-level error wrapper types.

use crate::{ConfigError, JsonError, ParseError, ProviderError, ServerError, StorageError};

/// Every error condition that can surface from a notecraft crate.
///
/// # Examples
///
/// ```
/// use notecraft_error::{NotecraftError, ConfigError};
///
/// let err: NotecraftError = ConfigError::new("unknown provider").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum NotecraftErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Provider API error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Provider response did not match the expected structure
    #[from(ParseError)]
    Parse(ParseError),
    /// Storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Web interface error
    #[from(ServerError)]
    Server(ServerError),
}

/// Notecraft error with kind discrimination.
///
/// # Examples
///
/// ```
/// use notecraft_error::{NotecraftResult, ConfigError};
///
/// fn might_fail() -> NotecraftResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Notecraft Error: {}", _0)]
pub struct NotecraftError(Box<NotecraftErrorKind>);

impl NotecraftError {
    /// Create a new error from a kind.
    pub fn new(kind: NotecraftErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &NotecraftErrorKind {
        &self.0
    }

    /// True for configuration problems, which are reported before generation starts.
    pub fn is_config(&self) -> bool {
        matches!(self.kind(), NotecraftErrorKind::Config(_))
    }
}

// Generic From implementation for any type that converts to NotecraftErrorKind
impl<T> From<T> for NotecraftError
where
    T: Into<NotecraftErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

impl crate::RetryableError for NotecraftError {
    fn is_retryable(&self) -> bool {
        match self.kind() {
            NotecraftErrorKind::Provider(e) => e.kind.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for notecraft operations.
pub type NotecraftResult<T> = std::result::Result<T, NotecraftError>;
