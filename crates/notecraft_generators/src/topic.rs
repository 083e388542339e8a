//! Topic generation.

use crate::parse::parse_topics;
use notecraft_config::{PromptTemplate, PromptTemplates};
use notecraft_core::{TextParams, Topic};
use notecraft_error::NotecraftResult;
use notecraft_interface::TextGeneration;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Asks a text provider for post ideas in a category.
#[derive(Clone)]
pub struct TopicGenerator {
    text: Arc<dyn TextGeneration>,
    template: PromptTemplate,
    params: TextParams,
}

impl std::fmt::Debug for TopicGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicGenerator")
            .field("provider", &self.text.provider_name())
            .field("template", &self.template)
            .finish()
    }
}

impl TopicGenerator {
    /// Creates a generator using the `topic_generation` template.
    pub fn new(text: Arc<dyn TextGeneration>, prompts: &PromptTemplates) -> Self {
        Self {
            text,
            template: prompts.topic_generation.clone(),
            params: crate::text_params(prompts),
        }
    }

    /// Name of the provider behind this generator.
    pub fn provider_name(&self) -> &str {
        self.text.provider_name()
    }

    /// Generates up to `count` topics for `category`.
    ///
    /// Entries the parser cannot read are dropped, so fewer than `count`
    /// topics may come back. A count of zero returns immediately.
    #[instrument(skip(self), fields(provider = %self.text.provider_name()))]
    pub async fn generate_topics(&self, category: &str, count: usize) -> NotecraftResult<Vec<Topic>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let count_text = count.to_string();
        let prompt = self
            .template
            .render(&[("count", count_text.as_str()), ("category", category)]);
        let response = self.text.generate_text(&prompt, &self.params).await?;

        let topics = parse_topics(&response, category, count);
        if topics.len() < count {
            warn!(requested = count, parsed = topics.len(), "Fewer topics than requested");
        }
        info!(count = topics.len(), "Generated topics");
        Ok(topics)
    }
}
