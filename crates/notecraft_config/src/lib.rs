//! Configuration for notecraft.
//!
//! Configuration is TOML, layered with the `config` crate:
//! - Bundled defaults (`include_str!` of the workspace `notecraft.toml`)
//! - `~/.config/notecraft/notecraft.toml`
//! - `./notecraft.toml`, or an explicit path
//! - `NOTECRAFT_*` environment variables (`__` separates nested keys)
//!
//! Loaded configuration is validated before it is returned, so a missing
//! template placeholder or an unknown provider is reported before any
//! request is made.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod settings;
mod template;

pub use settings::{
    Capability, GenerationConfig, NotecraftConfig, OutputConfig, ProviderApi, ProviderConfig,
    WebConfig,
};
pub use template::{PromptTemplate, PromptTemplates};
