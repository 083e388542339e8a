//! Plain-text rendering of generation results.

use notecraft::{BatchReport, Content, ContentReport, ImageResult, Note, Topic};
use std::fmt::Write;

pub fn topics(topics: &[Topic]) -> String {
    if topics.is_empty() {
        return "No topics could be parsed from the response.".to_string();
    }
    let mut out = format!("Generated {} topics:\n", topics.len());
    for (i, topic) in topics.iter().enumerate() {
        let _ = writeln!(out, "\n{}. {}", i + 1, topic.title());
        if !topic.description().is_empty() {
            let _ = writeln!(out, "   {}", topic.description());
        }
        let _ = writeln!(out, "   Category: {}", topic.category());
        if !topic.tags().is_empty() {
            let _ = writeln!(out, "   Tags: {}", topic.tags().join(", "));
        }
    }
    out
}

pub fn content(content: &Content) -> String {
    let mut out = format!("Title: {}\n\n{}\n", content.title(), content.body());
    if !content.hashtags().is_empty() {
        let _ = writeln!(out, "\n{}", content.hashtag_line());
    }
    if !content.call_to_action().is_empty() {
        let _ = writeln!(out, "\n{}", content.call_to_action());
    }
    out
}

pub fn images(images: &[ImageResult]) -> String {
    let mut out = String::new();
    for (i, image) in images.iter().enumerate() {
        let _ = writeln!(
            out,
            "Image {}: {} ({}x{}, {})",
            i + 1,
            image.path().display(),
            image.width(),
            image.height(),
            image.provider()
        );
    }
    out
}

pub fn note(note: &Note) -> String {
    let mut out = format!("Note {}\n", note.id());
    out.push_str(&content(note.content()));
    let metadata = note.metadata();
    let _ = writeln!(
        out,
        "\nCategory: {} | Style: {} | Text provider: {}",
        note.category(),
        metadata.style(),
        metadata.content_provider()
    );
    out.push_str(&images(note.images()));
    if *metadata.image_failures() > 0 {
        let _ = writeln!(out, "{} image(s) could not be generated", metadata.image_failures());
    }
    out
}

pub fn batch(report: &BatchReport) -> String {
    let mut out = String::new();
    if let Some(e) = report.topic_error() {
        let _ = writeln!(out, "Topic generation failed: {}", e);
    }
    for (i, note) in report.notes().iter().enumerate() {
        let _ = writeln!(
            out,
            "{}. {} [{}] {} image(s)",
            i + 1,
            note.title(),
            note.short_id(),
            note.images().len()
        );
    }
    for failure in report.failures() {
        let _ = writeln!(
            out,
            "Item {} ({}) failed: {}",
            failure.index() + 1,
            failure.topic(),
            failure.message()
        );
    }
    let _ = writeln!(
        out,
        "Batch finished: {} requested, {} succeeded, {} failed",
        report.requested(),
        report.succeeded(),
        report.failed()
    );
    out
}

pub fn contents(report: &ContentReport) -> String {
    let mut out = String::new();
    for (i, item) in report.contents().iter().enumerate() {
        let _ = writeln!(out, "=== {} ===", i + 1);
        out.push_str(&content(item));
        out.push('\n');
    }
    for failure in report.failures() {
        let _ = writeln!(out, "{} failed: {}", failure.topic(), failure.message());
    }
    out
}

pub fn history(notes: &[Note]) -> String {
    if notes.is_empty() {
        return "No saved notes.".to_string();
    }
    let mut out = String::new();
    for note in notes {
        let _ = writeln!(
            out,
            "{}  {}  {}  [{}]",
            note.metadata().created_at().format("%Y-%m-%d %H:%M"),
            note.short_id(),
            note.title(),
            note.category()
        );
    }
    out
}
