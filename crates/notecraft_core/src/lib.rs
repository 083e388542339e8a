//! Core data types for notecraft.
//!
//! A [`Note`] is one assembled social post: a [`Content`] (which carries the
//! [`Topic`] it was written for), zero or more [`ImageResult`]s and
//! [`NoteMetadata`]. All records are immutable once generated.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod content;
mod image;
mod note;
mod params;
mod script;
mod topic;

pub use content::{Content, MAX_HASHTAGS, normalize_hashtags, strip_emoji};
pub use image::{GeneratedImage, ImageResult};
pub use note::{Note, NoteMetadata};
pub use params::{ImageParams, TextParams};
pub use script::ScriptFilter;
pub use topic::Topic;
