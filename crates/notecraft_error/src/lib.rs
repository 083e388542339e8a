//! Error types for notecraft.
//!
//! This crate provides the foundation error types used throughout the notecraft workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Provider errors additionally implement [`RetryableError`], which the retry
//! policy uses to separate transient failures from terminal ones.
//!
//! # Examples
//!
//! ```
//! use notecraft_error::{NotecraftResult, ParseError, ParseErrorKind};
//!
//! fn parse_title(raw: &str) -> NotecraftResult<String> {
//!     if raw.is_empty() {
//!         Err(ParseError::new(ParseErrorKind::MissingSection("title".into())))?
//!     }
//!     Ok(raw.to_string())
//! }
//!
//! assert!(parse_title("").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod json;
mod parse;
mod provider;
mod server;
mod storage;

pub use config::ConfigError;
pub use error::{NotecraftError, NotecraftErrorKind, NotecraftResult};
pub use json::JsonError;
pub use parse::{ParseError, ParseErrorKind};
pub use provider::{ProviderError, ProviderErrorKind, RetryableError};
pub use server::{ServerError, ServerErrorKind};
pub use storage::{StorageError, StorageErrorKind};
