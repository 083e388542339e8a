//! Assembled posts.

use crate::{Content, ImageResult};
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// Provenance recorded alongside a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct NoteMetadata {
    /// When the note was assembled
    created_at: DateTime<Utc>,
    /// Style label the content was written in
    style: String,
    /// Text provider that wrote the content
    content_provider: String,
    /// Image provider, when images were requested
    #[serde(default)]
    image_provider: Option<String>,
    /// Images that were requested but could not be produced
    #[serde(default)]
    image_failures: usize,
}

impl NoteMetadata {
    /// Creates metadata stamped with the current time.
    pub fn new(
        style: impl Into<String>,
        content_provider: impl Into<String>,
        image_provider: Option<String>,
        image_failures: usize,
    ) -> Self {
        Self {
            created_at: Utc::now(),
            style: style.into(),
            content_provider: content_provider.into(),
            image_provider,
            image_failures,
        }
    }
}

/// One complete social post: content, images and metadata.
///
/// # Examples
///
/// ```
/// use notecraft_core::{Content, Note, NoteMetadata, Topic};
///
/// let content = Content::new(
///     Topic::from_title("home", "Small balcony garden"),
///     "Balcony herbs",
///     "Basil, mint and chives in one planter.",
///     vec![],
///     "",
/// );
/// let note = Note::new(content, vec![], NoteMetadata::new("tutorial", "deepseek", None, 0));
/// assert_eq!(note.title(), "Balcony herbs");
/// assert_eq!(note.short_id().len(), 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Note {
    /// Unique identifier
    id: Uuid,
    /// Generated text
    content: Content,
    /// Images saved for the post
    #[serde(default)]
    images: Vec<ImageResult>,
    /// Provenance
    metadata: NoteMetadata,
}

impl Note {
    /// Assembles a note under a fresh identifier.
    pub fn new(content: Content, images: Vec<ImageResult>, metadata: NoteMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            content,
            images,
            metadata,
        }
    }

    /// First eight characters of the identifier.
    pub fn short_id(&self) -> String {
        self.id.simple().to_string()[..8].to_string()
    }

    /// Post title.
    pub fn title(&self) -> &str {
        self.content.title()
    }

    /// Post body.
    pub fn body(&self) -> &str {
        self.content.body()
    }

    /// Hashtags without the leading `#`.
    pub fn hashtags(&self) -> &[String] {
        self.content.hashtags()
    }

    /// Closing call-to-action.
    pub fn call_to_action(&self) -> &str {
        self.content.call_to_action()
    }

    /// Category of the topic the note was written for.
    pub fn category(&self) -> &str {
        self.content.topic().category()
    }

    /// Paths of the saved images, in generation order.
    pub fn image_paths(&self) -> Vec<PathBuf> {
        self.images.iter().map(|i| i.path().clone()).collect()
    }
}
