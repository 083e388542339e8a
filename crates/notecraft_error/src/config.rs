//! Errors in the layered `notecraft.toml` configuration.

/// A setting that cannot be used as written.
///
/// Covers files that fail to merge or deserialize, prompt templates missing
/// a placeholder, provider names with no `[providers.<name>]` section and
/// providers whose credentials are blank. The registry and the generators
/// raise it while resolving a request, so no provider is called with a
/// setting that is known to be wrong. The web interface answers it with 400.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What is wrong, naming the offending key
    pub message: String,
    /// Line that raised the error
    pub line: u32,
    /// Source file that raised the error
    pub file: &'static str,
}

impl ConfigError {
    /// Records `message` with the caller's location.
    ///
    /// ```
    /// use notecraft_error::ConfigError;
    ///
    /// let err = ConfigError::new("providers.deepseek.api_key is empty");
    /// assert!(err.to_string().starts_with("Configuration Error: providers.deepseek"));
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let caller = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: caller.line(),
            file: caller.file(),
        }
    }
}
