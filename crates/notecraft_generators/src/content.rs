//! Post writing.

use crate::parse::parse_content;
use notecraft_config::{PromptTemplate, PromptTemplates};
use notecraft_core::{Content, TextParams, Topic};
use notecraft_error::NotecraftResult;
use notecraft_interface::TextGeneration;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Asks a text provider to write a post for a topic.
#[derive(Clone)]
pub struct ContentGenerator {
    text: Arc<dyn TextGeneration>,
    template: PromptTemplate,
    params: TextParams,
}

impl std::fmt::Debug for ContentGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContentGenerator")
            .field("provider", &self.text.provider_name())
            .field("template", &self.template)
            .finish()
    }
}

impl ContentGenerator {
    /// Creates a generator using the `content_generation` template.
    pub fn new(text: Arc<dyn TextGeneration>, prompts: &PromptTemplates) -> Self {
        Self {
            text,
            template: prompts.content_generation.clone(),
            params: crate::text_params(prompts),
        }
    }

    /// Name of the provider behind this generator.
    pub fn provider_name(&self) -> &str {
        self.text.provider_name()
    }

    /// Writes a post about `topic` in `style`.
    ///
    /// # Errors
    ///
    /// Provider errors propagate; a response without a title or body is a
    /// parse error.
    #[instrument(skip(self, topic), fields(provider = %self.text.provider_name(), topic = %topic.title()))]
    pub async fn generate_content(&self, topic: &Topic, style: &str) -> NotecraftResult<Content> {
        let prompt = self.template.render(&[
            ("topic", topic.title().as_str()),
            ("style", style),
            ("category", topic.category().as_str()),
            ("description", topic.description().as_str()),
        ]);
        let response = self.text.generate_text(&prompt, &self.params).await?;
        debug!(chars = response.chars().count(), "Received post text");

        let content = parse_content(&response, topic.clone())?;
        info!(title = %content.title(), hashtags = content.hashtags().len(), "Generated content");
        Ok(content)
    }
}
