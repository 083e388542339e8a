//! JSON note persistence.

use crate::atomic::{ensure_dir, write_atomic};
use notecraft_core::Note;
use notecraft_error::{JsonError, NotecraftResult, StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument, warn};

const MAX_TITLE_CHARS: usize = 50;
const RESERVED: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Storage backend for finished notes.
#[async_trait::async_trait]
pub trait NoteStorage: Send + Sync {
    /// Persists `note` and returns where it was written.
    async fn save(&self, note: &Note) -> NotecraftResult<PathBuf>;

    /// Reads a note previously written by [`save`](Self::save).
    async fn load(&self, path: &Path) -> NotecraftResult<Note>;

    /// Every saved note, newest first.
    async fn list(&self) -> NotecraftResult<Vec<Note>>;
}

/// Title as it appears in a note filename.
///
/// Spaces become `_`, path separators, reserved characters and control
/// characters are dropped, and the result is cut to 50 characters.
///
/// ```
/// use notecraft_storage::sanitize_title;
///
/// assert_eq!(sanitize_title("Autumn: a/b test?"), "Autumn_ab_test");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let cleaned: String = title
        .trim()
        .chars()
        .filter(|c| !RESERVED.contains(c) && !c.is_control())
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .take(MAX_TITLE_CHARS)
        .collect();
    if cleaned.is_empty() {
        "untitled".to_string()
    } else {
        cleaned
    }
}

/// `{short id}_{sanitized title}.json`
pub fn note_filename(note: &Note) -> String {
    format!("{}_{}.json", note.short_id(), sanitize_title(note.title()))
}

/// Notes stored as pretty-printed JSON files in one directory.
#[derive(Debug, Clone)]
pub struct FileSystemNoteStorage {
    dir: PathBuf,
}

impl FileSystemNoteStorage {
    /// Opens the storage, creating `dir` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the directory cannot be created.
    #[instrument(skip(dir))]
    pub fn new(dir: impl Into<PathBuf>) -> NotecraftResult<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        debug!(path = %dir.display(), "Opened note storage");
        Ok(Self { dir })
    }

    /// Directory the notes are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait::async_trait]
impl NoteStorage for FileSystemNoteStorage {
    #[instrument(skip(self, note), fields(id = %note.id()))]
    async fn save(&self, note: &Note) -> NotecraftResult<PathBuf> {
        let data = serde_json::to_vec_pretty(note)
            .map_err(|e| JsonError::new(format!("Failed to encode note {}: {}", note.id(), e)))?;
        let path = self.dir.join(note_filename(note));
        write_atomic(&path, &data).await?;
        info!(path = %path.display(), title = note.title(), "Saved note");
        Ok(path)
    }

    #[instrument(skip(self), fields(path = %path.display()))]
    async fn load(&self, path: &Path) -> NotecraftResult<Note> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(path.display().to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })?;
        let note = serde_json::from_slice(&data).map_err(|e| {
            StorageError::new(StorageErrorKind::Corrupt(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })?;
        Ok(note)
    }

    #[instrument(skip(self), fields(dir = %self.dir.display()))]
    async fn list(&self) -> NotecraftResult<Vec<Note>> {
        let read_error = |e: std::io::Error| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                self.dir.display(),
                e
            )))
        };

        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(read_error)?;
        let mut notes = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(read_error)? {
            let path = entry.path();
            let hidden = path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'));
            if hidden || path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.load(&path).await {
                Ok(note) => notes.push(note),
                Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable note"),
            }
        }

        notes.sort_by(|a, b| b.metadata().created_at().cmp(a.metadata().created_at()));
        debug!(count = notes.len(), "Listed notes");
        Ok(notes)
    }
}
