//! Generated post text.

use crate::Topic;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Upper bound on hashtags kept per post.
pub const MAX_HASHTAGS: usize = 8;

/// The generated textual body of a post.
///
/// Construction enforces the record's invariants: the title carries no
/// emoji, and hashtags are deduplicated, stored without the leading `#`
/// and capped at [`MAX_HASHTAGS`].
///
/// # Examples
///
/// ```
/// use notecraft_core::{Content, Topic};
///
/// let content = Content::new(
///     Topic::from_title("food", "Sourdough at home"),
///     "✨Sourdough basics✨",
///     "Feed the starter twice a day.",
///     vec!["#baking".into(), "bread".into(), "#baking".into()],
///     "Tell me your hydration ratio!",
/// );
/// assert_eq!(content.title(), "Sourdough basics");
/// assert_eq!(content.hashtags(), &vec!["baking".to_string(), "bread".to_string()]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct Content {
    /// Topic the content was written for
    topic: Topic,
    /// Post title, emoji-free
    title: String,
    /// Post body; may contain formatting markers
    body: String,
    /// Hashtags without the leading `#`
    #[serde(default)]
    hashtags: Vec<String>,
    /// Closing call-to-action
    #[serde(default)]
    call_to_action: String,
}

impl Content {
    /// Creates content, stripping emoji from the title and normalizing hashtags.
    pub fn new(
        topic: Topic,
        title: impl AsRef<str>,
        body: impl Into<String>,
        hashtags: Vec<String>,
        call_to_action: impl Into<String>,
    ) -> Self {
        Self {
            topic,
            title: strip_emoji(title.as_ref()),
            body: body.into(),
            hashtags: normalize_hashtags(hashtags),
            call_to_action: call_to_action.into(),
        }
    }

    /// Hashtags rendered with a leading `#`, joined by spaces.
    pub fn hashtag_line(&self) -> String {
        self.hashtags
            .iter()
            .map(|tag| format!("#{}", tag))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Removes emoji and pictographic symbols, then trims and collapses whitespace.
///
/// ```
/// use notecraft_core::strip_emoji;
///
/// assert_eq!(strip_emoji("🌸 春日 野餐 🧺"), "春日 野餐");
/// ```
pub fn strip_emoji(text: &str) -> String {
    text.chars()
        .filter(|c| !is_pictographic(*c))
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_pictographic(c: char) -> bool {
    matches!(c as u32,
        0x1F000..=0x1FAFF
        | 0x2600..=0x27BF
        | 0x2300..=0x23FF
        | 0x2B00..=0x2BFF
        | 0xFE00..=0xFE0F
        | 0x200D
        | 0x20E3
        | 0xE0020..=0xE007F)
}

/// Strips leading `#`, drops empties and duplicates (first occurrence wins)
/// and keeps at most [`MAX_HASHTAGS`] entries.
pub fn normalize_hashtags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().trim_start_matches('#').trim();
        if tag.is_empty() || seen.iter().any(|t: &String| t == tag) {
            continue;
        }
        seen.push(tag.to_string());
        if seen.len() == MAX_HASHTAGS {
            break;
        }
    }
    seen
}
