//! The notecraft generation pipeline.
//!
//! - [`TopicGenerator`] turns a category into post ideas
//! - [`ContentGenerator`] writes a post for a topic
//! - [`ImageGenerator`] illustrates a post and saves the images
//! - [`NoteGenerator`] runs all three, assembles a [`Note`](notecraft_core::Note)
//!   and saves it
//!
//! Generators depend only on the capability traits, so any configured
//! provider can stand behind any stage.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod content;
mod image;
mod note;
mod parse;
mod topic;

pub use content::ContentGenerator;
pub use image::{ImageBatch, ImageGenerator};
pub use note::{BatchFailure, BatchReport, ContentReport, NoteGenerator, NoteRequest};
pub use parse::{parse_content, parse_topics, split_tags};
pub use topic::TopicGenerator;

use notecraft_config::PromptTemplates;
use notecraft_core::TextParams;

/// Sampling parameters carrying the configured system prompt, if any.
pub(crate) fn text_params(prompts: &PromptTemplates) -> TextParams {
    let params = TextParams::default();
    if prompts.system.trim().is_empty() {
        params
    } else {
        params.with_system_prompt(prompts.system.trim())
    }
}
