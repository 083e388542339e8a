//! Image file storage.

use crate::atomic::{ensure_dir, write_atomic};
use notecraft_core::GeneratedImage;
use notecraft_error::NotecraftResult;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};
use uuid::Uuid;

/// Storage backend for generated images.
#[async_trait::async_trait]
pub trait ImageStorage: Send + Sync {
    /// Writes `image` under a fresh name and returns its path.
    async fn store(&self, provider: &str, image: &GeneratedImage) -> NotecraftResult<PathBuf>;
}

/// `{provider}_{8 hex chars of a new uuid}.{ext}`
pub fn image_filename(provider: &str, image: &GeneratedImage) -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("{}_{}.{}", provider, &id[..8], image.extension())
}

/// Images stored as plain files in one directory.
#[derive(Debug, Clone)]
pub struct FileSystemImageStorage {
    dir: PathBuf,
}

impl FileSystemImageStorage {
    /// Opens the storage, creating `dir` if it does not exist.
    pub fn new(dir: impl Into<PathBuf>) -> NotecraftResult<Self> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    /// Directory the images are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait::async_trait]
impl ImageStorage for FileSystemImageStorage {
    #[instrument(skip(self, image), fields(size = image.data().len()))]
    async fn store(&self, provider: &str, image: &GeneratedImage) -> NotecraftResult<PathBuf> {
        let path = self.dir.join(image_filename(provider, image));
        write_atomic(&path, image.data()).await?;
        info!(path = %path.display(), "Saved image");
        Ok(path)
    }
}
