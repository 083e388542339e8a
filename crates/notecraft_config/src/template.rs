//! Prompt templates with named `{placeholder}`s.

use notecraft_error::ConfigError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid")
});

/// A prompt with named placeholders such as `{topic}`.
///
/// Placeholders without a supplied value are left in place.
///
/// # Examples
///
/// ```
/// use notecraft_config::PromptTemplate;
///
/// let template = PromptTemplate::new("Write {count} ideas about {category}.");
/// assert!(template.placeholders().contains("count"));
/// assert_eq!(
///     template.render(&[("count", "3"), ("category", "tea")]),
///     "Write 3 ideas about tea."
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PromptTemplate(String);

impl PromptTemplate {
    /// Wraps template text.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Raw template text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names of all placeholders present.
    pub fn placeholders(&self) -> BTreeSet<String> {
        PLACEHOLDER
            .captures_iter(&self.0)
            .map(|c| c[1].to_string())
            .collect()
    }

    /// Substitutes each `{name}` for which a value is given.
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        PLACEHOLDER
            .replace_all(&self.0, |caps: &regex::Captures<'_>| {
                let name = &caps[1];
                values
                    .iter()
                    .find(|(key, _)| *key == name)
                    .map(|(_, value)| value.to_string())
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Fails when any of `required` is missing from the template.
    pub fn require(&self, name: &str, required: &[&str]) -> Result<(), ConfigError> {
        let present = self.placeholders();
        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|p| !present.contains(*p))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::new(format!(
                "prompts.{} is missing required placeholder(s): {}",
                name,
                missing
                    .iter()
                    .map(|p| format!("{{{}}}", p))
                    .collect::<Vec<_>>()
                    .join(", ")
            )))
        }
    }
}

/// The named templates used by the generators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplates {
    /// System message sent with every text request
    #[serde(default)]
    pub system: String,
    /// Topic list prompt; needs `{count}` and `{category}`
    pub topic_generation: PromptTemplate,
    /// Post writing prompt; needs `{topic}` and `{style}`
    pub content_generation: PromptTemplate,
    /// Image prompt; needs `{title}`
    pub image_generation: PromptTemplate,
}

impl PromptTemplates {
    /// Placeholders each template must contain.
    pub const REQUIRED: [(&'static str, &'static [&'static str]); 3] = [
        ("topic_generation", &["count", "category"]),
        ("content_generation", &["topic", "style"]),
        ("image_generation", &["title"]),
    ];

    /// Looks a template up by its configuration name.
    pub fn get(&self, name: &str) -> Option<&PromptTemplate> {
        match name {
            "topic_generation" => Some(&self.topic_generation),
            "content_generation" => Some(&self.content_generation),
            "image_generation" => Some(&self.image_generation),
            _ => None,
        }
    }

    /// Checks every template for its required placeholders.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, required) in Self::REQUIRED {
            if let Some(template) = self.get(name) {
                template.require(name, required)?;
            }
        }
        Ok(())
    }
}
