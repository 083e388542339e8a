//! Parsers for the free-text formats the prompts ask providers to follow.
//!
//! Providers follow formatting instructions loosely: numbering styles vary,
//! colons come full-width or ASCII, and markdown emphasis creeps in. The
//! parsers accept those variations and nothing more.

use notecraft_core::{Content, Topic, strip_emoji};
use notecraft_error::{ParseError, ParseErrorKind};
use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

static NUMBERED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\s*[.、)）]\s*(.*)$").expect("valid numbered-line regex")
});

static TOPIC_FIELD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(标题|title|描述|description|标签|tags)\s*[:：]\s*(.*)$")
        .expect("valid topic field regex")
});

static CONTENT_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:#+\s*)?(话题标签|标签|hashtags|tags|标题|title|正文|内容|body|互动引导|行动号召|call to action|cta)\s*[:：]\s*(.*)$",
    )
    .expect("valid content marker regex")
});

/// Removes markdown bold markers and surrounding whitespace.
fn clean_line(line: &str) -> String {
    line.replace("**", "").trim().to_string()
}

/// Splits a tag list on commas, whitespace, `、` and `#`.
pub fn split_tags(text: &str) -> Vec<String> {
    text.split(|c: char| c == ',' || c == '，' || c == '、' || c == '#' || c.is_whitespace())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Default)]
struct TopicDraft {
    title: String,
    description: String,
    tags: Vec<String>,
}

impl TopicDraft {
    fn finish(self, category: &str) -> Option<Topic> {
        if self.title.is_empty() || self.description.is_empty() {
            debug!(title = %self.title, "Dropping incomplete topic entry");
            return None;
        }
        Some(Topic::new(category, self.title, self.description, self.tags))
    }
}

/// Parses a numbered topic list into at most `count` topics.
///
/// Entries missing a title or a description are dropped.
///
/// ```
/// use notecraft_generators::parse_topics;
///
/// let text = "1. 标题：阳台种菜\n描述：小空间也能收获\n标签：种菜、阳台\n\n2. 标题：只有标题";
/// let topics = parse_topics(text, "生活方式", 5);
/// assert_eq!(topics.len(), 1);
/// assert_eq!(topics[0].title(), "阳台种菜");
/// assert_eq!(topics[0].tags(), &["种菜", "阳台"]);
/// ```
pub fn parse_topics(text: &str, category: &str, count: usize) -> Vec<Topic> {
    let mut topics = Vec::new();
    let mut draft: Option<TopicDraft> = None;

    for raw in text.lines() {
        let line = clean_line(raw);
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = NUMBERED.captures(&line) {
            if let Some(done) = draft.take().and_then(|d| d.finish(category)) {
                topics.push(done);
            }
            let mut next = TopicDraft::default();
            let rest = caps[2].trim();
            match TOPIC_FIELD.captures(rest) {
                Some(field) if is_title_label(&field[1]) => next.title = field[2].trim().to_string(),
                Some(_) => {}
                None => next.title = rest.to_string(),
            }
            draft = Some(next);
            continue;
        }

        let (Some(current), Some(field)) = (draft.as_mut(), TOPIC_FIELD.captures(&line)) else {
            continue;
        };
        let value = field[2].trim();
        match field[1].to_lowercase().as_str() {
            "标题" | "title" if current.title.is_empty() => current.title = value.to_string(),
            "描述" | "description" => current.description = value.to_string(),
            "标签" | "tags" => current.tags = split_tags(value),
            _ => {}
        }
    }

    if let Some(done) = draft.and_then(|d| d.finish(category)) {
        topics.push(done);
    }
    topics.truncate(count);
    topics
}

fn is_title_label(label: &str) -> bool {
    matches!(label.to_lowercase().as_str(), "标题" | "title")
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Section {
    Title,
    Body,
    Hashtags,
    CallToAction,
}

impl Section {
    fn from_marker(marker: &str) -> Self {
        match marker.to_lowercase().as_str() {
            "标题" | "title" => Section::Title,
            "正文" | "内容" | "body" => Section::Body,
            "话题标签" | "标签" | "hashtags" | "tags" => Section::Hashtags,
            _ => Section::CallToAction,
        }
    }
}

/// Parses a sectioned post into [`Content`] for `topic`.
///
/// Title and body are mandatory; hashtags and call-to-action default to
/// empty. Body lines keep their line breaks.
///
/// # Errors
///
/// Returns [`ParseErrorKind::Empty`] for a blank response and
/// [`ParseErrorKind::MissingSection`] when the title or body is absent.
pub fn parse_content(text: &str, topic: Topic) -> Result<Content, ParseError> {
    if text.trim().is_empty() {
        return Err(ParseError::new(ParseErrorKind::Empty));
    }

    let mut title: Vec<String> = Vec::new();
    let mut body: Vec<String> = Vec::new();
    let mut hashtags: Vec<String> = Vec::new();
    let mut cta: Vec<String> = Vec::new();
    let mut section: Option<Section> = None;

    for raw in text.lines() {
        let line = clean_line(raw);
        let value = match CONTENT_MARKER.captures(&line) {
            Some(caps) => {
                section = Some(Section::from_marker(&caps[1]));
                caps[2].trim().to_string()
            }
            None => line,
        };

        let target = match section {
            Some(Section::Title) => &mut title,
            Some(Section::Body) => &mut body,
            Some(Section::Hashtags) => &mut hashtags,
            Some(Section::CallToAction) => &mut cta,
            None => continue,
        };
        if !value.is_empty() || (section == Some(Section::Body) && !target.is_empty()) {
            target.push(value);
        }
    }

    let title = title.first().map(|t| strip_emoji(t)).unwrap_or_default();
    if title.is_empty() {
        return Err(ParseError::new(ParseErrorKind::MissingSection("title".to_string())));
    }
    let body = body.join("\n").trim().to_string();
    if body.is_empty() {
        return Err(ParseError::new(ParseErrorKind::MissingSection("body".to_string())));
    }

    Ok(Content::new(
        topic,
        title,
        body,
        split_tags(&hashtags.join(" ")),
        cta.join("\n").trim(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_topics_accept_numbering_variants() {
        let text = "\
**1、标题：** 通勤穿搭
描述: 一周不重样
2) Title: Desk lunch ideas
Description: Five boxes, one Sunday
Tags: lunch, meal prep #budget
3）十分钟早餐
描述：上班族也能吃好";
        let topics = parse_topics(text, "生活方式", 10);
        let titles: Vec<&str> = topics.iter().map(|t| t.title().as_str()).collect();
        assert_eq!(titles, ["通勤穿搭", "Desk lunch ideas", "十分钟早餐"]);
        assert_eq!(topics[1].tags(), &["lunch", "meal", "prep", "budget"]);
        assert!(topics.iter().all(|t| t.category() == "生活方式"));
    }

    #[test]
    fn test_topics_title_on_following_line() {
        let text = "1.\n标题：露营装备清单\n描述：新手也不踩坑";
        let topics = parse_topics(text, "户外", 1);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].title(), "露营装备清单");
        assert!(topics[0].tags().is_empty());
    }

    #[test]
    fn test_topics_truncated_to_count() {
        let text = "1. A\n描述：a\n2. B\n描述：b\n3. C\n描述：c";
        assert_eq!(parse_topics(text, "x", 2).len(), 2);
    }

    #[test]
    fn test_topics_ignore_preamble() {
        let text = "好的，以下是选题：\n描述：这一行不属于任何选题\n1. 标题：读书笔记\n描述：一年读50本";
        let topics = parse_topics(text, "学习", 5);
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].description(), "一年读50本");
    }

    #[test]
    fn test_content_chinese_markers() -> Result<(), ParseError> {
        let text = "\
标题：秋天第一杯奶茶🍂
正文：
第一段：选店。

第二段：选口味。
话题标签：#秋天 #奶茶 #秋天
互动引导：你喝了吗？";
        let content = parse_content(text, Topic::from_title("美食", "秋天的奶茶"))?;
        assert_eq!(content.title(), "秋天第一杯奶茶");
        assert_eq!(content.body(), "第一段：选店。\n\n第二段：选口味。");
        assert_eq!(content.hashtags(), &["秋天", "奶茶"]);
        assert_eq!(content.call_to_action(), "你喝了吗？");
        Ok(())
    }

    #[test]
    fn test_content_english_markers_with_emphasis() -> Result<(), ParseError> {
        let text = "**Title:** Five desk stretches\n**Body:** Roll your shoulders.\nThen your neck.\n## Hashtags: #desk #health\nCTA: Save this for later";
        let content = parse_content(text, Topic::from_title("health", "stretches"))?;
        assert_eq!(content.title(), "Five desk stretches");
        assert_eq!(content.body(), "Roll your shoulders.\nThen your neck.");
        assert_eq!(content.hashtags(), &["desk", "health"]);
        assert_eq!(content.call_to_action(), "Save this for later");
        Ok(())
    }

    #[test]
    fn test_content_optional_sections_default_empty() -> Result<(), ParseError> {
        let content = parse_content("标题：短\n内容：只有正文", Topic::from_title("c", "t"))?;
        assert!(content.hashtags().is_empty());
        assert_eq!(content.call_to_action(), "");
        Ok(())
    }

    #[test]
    fn test_content_missing_body() {
        let err = parse_content("标题：只有标题\n话题标签：#a", Topic::from_title("c", "t"))
            .expect_err("body is mandatory");
        assert_eq!(err.kind, ParseErrorKind::MissingSection("body".to_string()));
    }

    #[test]
    fn test_content_missing_title() {
        let err = parse_content("正文：没有标题的正文", Topic::from_title("c", "t"))
            .expect_err("title is mandatory");
        assert_eq!(err.kind, ParseErrorKind::MissingSection("title".to_string()));
    }

    #[test]
    fn test_content_emoji_only_title_is_missing() {
        let err = parse_content("标题：🌸✨🍂\n正文：正文内容", Topic::from_title("c", "t"))
            .expect_err("an emoji-only title leaves nothing");
        assert_eq!(err.kind, ParseErrorKind::MissingSection("title".to_string()));
    }

    #[test]
    fn test_content_empty_response() {
        let err = parse_content("  \n ", Topic::from_title("c", "t")).expect_err("empty");
        assert_eq!(err.kind, ParseErrorKind::Empty);
    }
}
