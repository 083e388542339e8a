//! HTML rendering.

use axum::http::StatusCode;
use notecraft_core::{Content, ImageResult, Note, Topic};
use notecraft_generators::{BatchReport, ContentReport, ImageBatch};
use std::fmt::Write;

/// Escapes text for HTML element content and attribute values.
///
/// ```
/// use notecraft_server::escape_html;
///
/// assert_eq!(escape_html(r#"<b a="1">&'"#), "&lt;b a=&quot;1&quot;&gt;&amp;&#39;");
/// ```
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const STYLE: &str = "body{font-family:sans-serif;max-width:860px;margin:2em auto;padding:0 1em;color:#222}\
form{border:1px solid #ddd;border-radius:8px;padding:1em;margin:1em 0}\
label{display:inline-block;min-width:9em}input{margin:.2em 0}\
.note{border-left:4px solid #ff2442;padding-left:1em;margin:1.5em 0}\
.body{white-space:pre-wrap}.tags{color:#13386c}.error{color:#b00020}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"zh\"><head><meta charset=\"utf-8\"><title>{} · notecraft</title>\
         <style>{}</style></head><body><p><a href=\"/\">notecraft</a> · <a href=\"/history\">history</a></p>\
         <h1>{}</h1>\n{}\n</body></html>",
        escape_html(title),
        STYLE,
        escape_html(title),
        body
    )
}

fn field(name: &str, label: &str, value: &str) -> String {
    format!(
        "<p><label for=\"{name}\">{}</label><input id=\"{name}\" name=\"{name}\" value=\"{}\"></p>",
        escape_html(label),
        escape_html(value),
    )
}

fn text_area(name: &str, label: &str) -> String {
    format!(
        "<p><label for=\"{name}\">{}</label><textarea id=\"{name}\" name=\"{name}\" rows=\"3\"></textarea></p>",
        escape_html(label),
    )
}

fn form(action: &str, heading: &str, fields: &[String]) -> String {
    format!(
        "<form method=\"post\" action=\"{}\"><h2>{}</h2>{}<button type=\"submit\">Generate</button></form>",
        action,
        escape_html(heading),
        fields.concat()
    )
}

/// Defaults shown in the forms.
#[derive(Debug, Clone, Default)]
pub(crate) struct FormDefaults {
    pub category: String,
    pub style: String,
    pub topic_count: usize,
    pub image_count: usize,
    pub content_provider: String,
    pub image_provider: String,
}

pub(crate) fn index_page(d: &FormDefaults) -> String {
    let topic_count = d.topic_count.to_string();
    let image_count = d.image_count.to_string();
    let forms = [
        form(
            "/topics",
            "Topics",
            &[
                field("category", "Category", &d.category),
                field("count", "Count", &topic_count),
                field("provider", "Provider", &d.content_provider),
            ],
        ),
        form(
            "/content",
            "Content",
            &[
                field("topic", "Topic", ""),
                field("category", "Category", &d.category),
                field("style", "Style", &d.style),
                field("provider", "Provider", &d.content_provider),
            ],
        ),
        form(
            "/topic-contents",
            "Topics with content",
            &[
                field("category", "Category", &d.category),
                field("count", "Count", &topic_count),
                field("style", "Style", &d.style),
                field("provider", "Provider", &d.content_provider),
            ],
        ),
        form(
            "/image",
            "Image",
            &[
                field("prompt", "Prompt", ""),
                field("provider", "Provider", &d.image_provider),
                field("width", "Width", "1080"),
                field("height", "Height", "1920"),
                field("count", "Count", &image_count),
            ],
        ),
        form(
            "/note",
            "Note",
            &[
                field("topic", "Topic (optional)", ""),
                field("category", "Category", &d.category),
                field("style", "Style", &d.style),
                field("content_provider", "Content provider", &d.content_provider),
                field("image_provider", "Image provider", &d.image_provider),
                field("image_count", "Images", &image_count),
                text_area("image_prompts", "Image prompts, one per line (optional)"),
            ],
        ),
        form(
            "/batch",
            "Batch",
            &[
                field("count", "Notes", &topic_count),
                field("category", "Category", &d.category),
                field("style", "Style", &d.style),
                field("content_provider", "Content provider", &d.content_provider),
                field("image_provider", "Image provider", &d.image_provider),
                field("image_count", "Images per note", &image_count),
            ],
        ),
    ];
    page("Generate", &forms.concat())
}

fn topic_html(topic: &Topic) -> String {
    let mut html = format!(
        "<li><strong>{}</strong><br>{}",
        escape_html(topic.title()),
        escape_html(topic.description())
    );
    if !topic.tags().is_empty() {
        let _ = write!(html, "<br><span class=\"tags\">{}</span>", escape_html(&topic.tags().join(" · ")));
    }
    html.push_str("</li>");
    html
}

pub(crate) fn topics_page(category: &str, topics: &[Topic]) -> String {
    let items: String = topics.iter().map(topic_html).collect();
    let body = if topics.is_empty() {
        "<p>No topics could be parsed from the response.</p>".to_string()
    } else {
        format!("<ol>{}</ol>", items)
    };
    page(&format!("Topics: {}", category), &body)
}

fn content_html(content: &Content) -> String {
    let mut html = format!(
        "<h2>{}</h2><div class=\"body\">{}</div>",
        escape_html(content.title()),
        escape_html(content.body())
    );
    if !content.hashtags().is_empty() {
        let _ = write!(html, "<p class=\"tags\">{}</p>", escape_html(&content.hashtag_line()));
    }
    if !content.call_to_action().is_empty() {
        let _ = write!(html, "<p><em>{}</em></p>", escape_html(content.call_to_action()));
    }
    html
}

pub(crate) fn content_page(content: &Content) -> String {
    page("Content", &format!("<div class=\"note\">{}</div>", content_html(content)))
}

fn images_html(images: &[ImageResult]) -> String {
    let items: String = images
        .iter()
        .map(|i| {
            format!(
                "<li><code>{}</code> ({}×{}, {})</li>",
                escape_html(&i.path().display().to_string()),
                i.width(),
                i.height(),
                escape_html(i.provider())
            )
        })
        .collect();
    format!("<ul>{}</ul>", items)
}

pub(crate) fn image_page(batch: &ImageBatch) -> String {
    let mut body = images_html(batch.images());
    if *batch.failures() > 0 {
        let _ = write!(body, "<p class=\"error\">{} image(s) failed.</p>", batch.failures());
    }
    page("Images", &body)
}

fn note_html(note: &Note) -> String {
    let meta = note.metadata();
    format!(
        "<div class=\"note\"><p><small>{} · {} · {} · {}</small></p>{}{}</div>",
        escape_html(&note.short_id()),
        escape_html(note.category()),
        escape_html(meta.style()),
        meta.created_at().format("%Y-%m-%d %H:%M"),
        content_html(note.content()),
        images_html(note.images())
    )
}

pub(crate) fn note_page(note: &Note) -> String {
    page("Note", &note_html(note))
}

pub(crate) fn batch_page(report: &BatchReport) -> String {
    let mut body = format!(
        "<p>{} requested, {} generated, {} failed.</p>",
        report.requested(),
        report.succeeded(),
        report.failed()
    );
    if let Some(e) = report.topic_error() {
        let _ = write!(body, "<p class=\"error\">Topic generation failed: {}</p>", escape_html(e));
    }
    for failure in report.failures() {
        let _ = write!(
            body,
            "<p class=\"error\">#{} {}: {}</p>",
            failure.index() + 1,
            escape_html(failure.topic()),
            escape_html(failure.message())
        );
    }
    body.extend(report.notes().iter().map(note_html));
    page("Batch", &body)
}

pub(crate) fn contents_page(report: &ContentReport) -> String {
    let mut body: String = report
        .contents()
        .iter()
        .map(|c| format!("<div class=\"note\">{}</div>", content_html(c)))
        .collect();
    for failure in report.failures() {
        let _ = write!(
            body,
            "<p class=\"error\">{}: {}</p>",
            escape_html(failure.topic()),
            escape_html(failure.message())
        );
    }
    page("Topic contents", &body)
}

pub(crate) fn history_page(notes: &[Note]) -> String {
    let body = if notes.is_empty() {
        "<p>No saved notes yet.</p>".to_string()
    } else {
        notes.iter().map(note_html).collect()
    };
    page("History", &body)
}

pub(crate) fn error_page(status: StatusCode, message: &str) -> String {
    page(
        &format!("Error {}", status.as_u16()),
        &format!("<p class=\"error\">{}</p>", escape_html(message)),
    )
}
