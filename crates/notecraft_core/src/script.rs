//! Character filtering for image prompts.

use serde::{Deserialize, Serialize};

/// Which script's characters survive when a title is embedded in an image prompt.
///
/// Image models tend to render stray punctuation, emoji and mixed-script
/// fragments as garbled glyphs, so only the content language is kept.
///
/// # Examples
///
/// ```
/// use notecraft_core::ScriptFilter;
///
/// assert_eq!(ScriptFilter::Han.apply("秋日🍂穿搭 OOTD!"), "秋日穿搭");
/// assert_eq!(ScriptFilter::Latin.apply("Autumn 🍂 looks!"), "Autumn looks");
/// assert_eq!("han".parse::<ScriptFilter>().ok(), Some(ScriptFilter::Han));
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ScriptFilter {
    /// Keep CJK ideographs only
    #[default]
    Han,
    /// Keep ASCII letters and digits
    Latin,
    /// Keep everything
    Any,
}

impl ScriptFilter {
    /// Returns `text` with characters outside the script removed and whitespace collapsed.
    pub fn apply(&self, text: &str) -> String {
        let kept: String = match self {
            ScriptFilter::Any => return text.split_whitespace().collect::<Vec<_>>().join(" "),
            ScriptFilter::Han => text.chars().filter(|c| is_han(*c)).collect(),
            ScriptFilter::Latin => text
                .chars()
                .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
                .collect(),
        };
        kept.split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

fn is_han(c: char) -> bool {
    matches!(c as u32,
        0x4E00..=0x9FFF
        | 0x3400..=0x4DBF
        | 0x20000..=0x2A6DF
        | 0xF900..=0xFAFF)
}
