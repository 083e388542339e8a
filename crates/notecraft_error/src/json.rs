//! JSON encoding and decoding failures.

/// A JSON document that could not be produced or read.
///
/// Raised when a note, a `--output` export or a listing cannot be encoded.
/// Undecodable provider bodies are `MalformedResponse` provider errors and
/// unreadable saved notes are `Corrupt` storage errors instead.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("JSON Error: {} at line {} in {}", message, line, file)]
pub struct JsonError {
    /// What failed to encode and the `serde_json` message
    pub message: String,
    /// Line that raised the error
    pub line: u32,
    /// Source file that raised the error
    pub file: &'static str,
}

impl JsonError {
    /// Records `message` with the caller's location.
    ///
    /// ```
    /// use notecraft_error::JsonError;
    ///
    /// let err = JsonError::new("Failed to encode note 1b2c: key must be a string");
    /// assert!(err.to_string().starts_with("JSON Error: Failed to encode note"));
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
