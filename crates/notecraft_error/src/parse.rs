//! Errors raised while parsing free-text provider responses.

/// Ways a provider response can fail to match the expected structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ParseErrorKind {
    /// A mandatory section marker was not found, or its section was empty
    #[display("Missing mandatory section: {}", _0)]
    MissingSection(String),
    /// The response contained no usable text
    #[display("Response was empty")]
    Empty,
}

/// Parse error with location tracking.
///
/// # Examples
///
/// ```
/// use notecraft_error::{ParseError, ParseErrorKind};
///
/// let err = ParseError::new(ParseErrorKind::MissingSection("title".to_string()));
/// assert!(format!("{}", err).contains("title"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Parse Error: {} at line {} in {}", kind, line, file)]
pub struct ParseError {
    /// The kind of error that occurred
    pub kind: ParseErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ParseError {
    /// Create a new ParseError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ParseErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
