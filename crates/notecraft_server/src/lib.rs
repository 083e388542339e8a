//! Browser form interface for notecraft.
//!
//! Serves an HTML page with one form per operation (topics, content, image,
//! note and batch) plus a history of saved notes. Every request goes
//! through one shared [`NoteGenerator`](notecraft_generators::NoteGenerator).

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod render;
mod routes;
mod server;

pub use error::WebError;
pub use render::escape_html;
pub use routes::{AppState, create_router};
pub use server::serve;
