//! Generated images.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// An image saved to disk for a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct ImageResult {
    /// Prompt sent to the image provider
    prompt: String,
    /// Where the image was written
    path: PathBuf,
    /// Requested width in pixels
    width: u32,
    /// Requested height in pixels
    height: u32,
    /// Provider that produced the image
    provider: String,
    /// Remote URL the image was downloaded from, when the provider returned one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_url: Option<String>,
}

impl ImageResult {
    /// Creates an image record.
    pub fn new(
        prompt: impl Into<String>,
        path: impl Into<PathBuf>,
        width: u32,
        height: u32,
        provider: impl Into<String>,
        source_url: Option<String>,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            path: path.into(),
            width,
            height,
            provider: provider.into(),
            source_url,
        }
    }
}

/// Raw image output of an image provider, before it is stored.
///
/// # Examples
///
/// ```
/// use notecraft_core::GeneratedImage;
///
/// let png = GeneratedImage::new(b"\x89PNG\r\n\x1a\n....".to_vec(), None);
/// assert_eq!(png.extension(), "png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GeneratedImage {
    /// Encoded image bytes
    data: Vec<u8>,
    /// Remote URL the bytes were downloaded from
    source_url: Option<String>,
}

impl GeneratedImage {
    /// Wraps downloaded or decoded image bytes.
    pub fn new(data: Vec<u8>, source_url: Option<String>) -> Self {
        Self { data, source_url }
    }

    /// File extension inferred from the image's magic bytes, `jpg` when unknown.
    pub fn extension(&self) -> &'static str {
        let d = &self.data;
        if d.starts_with(b"\x89PNG") {
            "png"
        } else if d.len() >= 12 && &d[0..4] == b"RIFF" && &d[8..12] == b"WEBP" {
            "webp"
        } else if d.starts_with(b"GIF8") {
            "gif"
        } else {
            "jpg"
        }
    }

    /// Consumes the image, returning its bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}
