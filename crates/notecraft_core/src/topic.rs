//! Candidate post subjects.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// A candidate subject for a post.
///
/// # Examples
///
/// ```
/// use notecraft_core::Topic;
///
/// let topic = Topic::new("travel", "Weekend in Kyoto", "Two days of temples", vec!["kyoto".into()]);
/// assert_eq!(topic.category(), "travel");
/// assert_eq!(topic.tags().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Topic {
    /// Category the topic was generated for
    category: String,
    /// Short headline
    title: String,
    /// One or two sentence description
    description: String,
    /// Ordered keyword tags
    #[serde(default)]
    tags: Vec<String>,
}

impl Topic {
    /// Creates a topic.
    pub fn new(
        category: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            category: category.into(),
            title: title.into(),
            description: description.into(),
            tags,
        }
    }

    /// Wraps a raw topic string supplied by the user.
    pub fn from_title(category: impl Into<String>, title: impl Into<String>) -> Self {
        Self::new(category, title, String::new(), Vec::new())
    }
}
