//! Generation parameters passed to providers.

use serde::{Deserialize, Serialize};

/// Sampling parameters for text generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextParams {
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of tokens to generate
    pub max_tokens: u32,
    /// Nucleus sampling cutoff
    pub top_p: f32,
    /// Optional system message sent ahead of the prompt
    pub system_prompt: Option<String>,
}

impl Default for TextParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 2000,
            top_p: 0.95,
            system_prompt: None,
        }
    }
}

impl TextParams {
    /// Returns a copy with the given system prompt.
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Image dimensions and seed.
///
/// Defaults to a 1080x1920 portrait frame.
///
/// ```
/// use notecraft_core::ImageParams;
///
/// let params = ImageParams::default();
/// assert_eq!((params.width, params.height), (1080, 1920));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageParams {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Fixed seed; providers pick one when absent
    pub seed: Option<i64>,
}

impl Default for ImageParams {
    fn default() -> Self {
        Self {
            width: 1080,
            height: 1920,
            seed: None,
        }
    }
}

impl ImageParams {
    /// Creates parameters for the given size with a provider-chosen seed.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            seed: None,
        }
    }
}
