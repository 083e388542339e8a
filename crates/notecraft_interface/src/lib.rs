//! Trait definitions for notecraft providers.
//!
//! Providers are external AI services. Each one is either text-generation
//! capable or image-generation capable; callers depend on the capability
//! ([`TextGeneration`] or [`ImageGeneration`]) and never on which concrete
//! service sits behind it.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{ImageGeneration, Provider, ProviderCatalog, TextGeneration};
