//! notecraft - social-media note generation
//!
//! notecraft calls large-language-model and image-generation APIs to write
//! social-media posts ("notes"): a topic, the post text and its images,
//! saved together as one JSON file.
//!
//! # Pipeline
//!
//! 1. [`TopicGenerator`] asks a text provider for candidate topics
//! 2. [`ContentGenerator`] writes the post for one topic
//! 3. [`ImageGenerator`] renders images keyed off the post title
//! 4. [`NoteGenerator`] runs the steps above and persists the [`Note`]
//!
//! Every API call goes through the retry wrapper in `notecraft_retry`.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use notecraft::{NoteGenerator, NoteRequest, NotecraftConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = NotecraftConfig::load(None)?;
//!     let generator = NoteGenerator::from_config(&config)?;
//!
//!     let request = NoteRequest {
//!         category: Some("美食".to_string()),
//!         ..Default::default()
//!     };
//!     let note = generator.generate_note(&request).await?;
//!     println!("{}", note.title());
//!     generator.release().await;
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `notecraft_error` - Error types
//! - `notecraft_core` - Topic, Content, Note and parameter types
//! - `notecraft_interface` - Provider capability traits
//! - `notecraft_retry` - Retry and backoff
//! - `notecraft_config` - Layered TOML configuration
//! - `notecraft_models` - Provider clients and the provider registry
//! - `notecraft_storage` - JSON note and image persistence
//! - `notecraft_generators` - Topic, content and image generators, orchestration
//! - `notecraft_server` - Browser form interface
//!
//! This crate re-exports the public surface of each and carries the
//! `notecraft` binary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod telemetry;

pub use telemetry::{LogOptions, filter_directive, init_logging};

// Errors
pub use notecraft_error::{
    ConfigError, JsonError, NotecraftError, NotecraftErrorKind, NotecraftResult, ParseError,
    ParseErrorKind, ProviderError, ProviderErrorKind, RetryableError, ServerError,
    ServerErrorKind, StorageError, StorageErrorKind,
};

// Data model
pub use notecraft_core::{
    Content, GeneratedImage, ImageParams, ImageResult, Note, NoteMetadata, ScriptFilter,
    TextParams, Topic,
};

// Provider traits
pub use notecraft_interface::{ImageGeneration, Provider, ProviderCatalog, TextGeneration};

// Retry
pub use notecraft_retry::*;

// Configuration
pub use notecraft_config::{
    Capability, GenerationConfig, NotecraftConfig, OutputConfig, PromptTemplate,
    PromptTemplates, ProviderApi, ProviderConfig, WebConfig,
};

// Providers
pub use notecraft_models::*;

// Storage
pub use notecraft_storage::{
    FileSystemImageStorage, FileSystemNoteStorage, ImageStorage, NoteStorage, write_json,
};

// Generators
pub use notecraft_generators::{
    BatchFailure, BatchReport, ContentGenerator, ContentReport, ImageBatch, ImageGenerator,
    NoteGenerator, NoteRequest, TopicGenerator,
};

// Web interface
pub use notecraft_server::{AppState, create_router, serve};
