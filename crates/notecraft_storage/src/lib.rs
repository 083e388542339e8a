//! Persistence for generated notes and images.
//!
//! Notes are written as one pretty-printed JSON file each; images are
//! written as plain files and referenced from the note by path. Both
//! backends write through a temp file and a rename, so a crash never
//! leaves a half-written file under its final name.
//!
//! # Example
//!
//! ```rust
//! use notecraft_core::{Content, Note, NoteMetadata, Topic};
//! use notecraft_storage::{FileSystemNoteStorage, NoteStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FileSystemNoteStorage::new("/tmp/notecraft/content")?;
//! let content = Content::new(
//!     Topic::from_title("travel", "Weekend in Hangzhou"),
//!     "Two days by the West Lake",
//!     "Rent a bike at dawn.",
//!     vec!["travel".to_string()],
//!     "",
//! );
//! let note = Note::new(content, vec![], NoteMetadata::new("guide", "deepseek", None, 0));
//!
//! let path = storage.save(&note).await?;
//! assert_eq!(storage.load(&path).await?, note);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod atomic;
mod export;
mod image;
mod note;

pub use export::write_json;
pub use image::{FileSystemImageStorage, ImageStorage, image_filename};
pub use note::{FileSystemNoteStorage, NoteStorage, note_filename, sanitize_title};
pub use notecraft_error::{StorageError, StorageErrorKind};
