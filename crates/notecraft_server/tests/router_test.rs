//! Tests for the web routes, driven through the router without a socket.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use notecraft_config::NotecraftConfig;
use notecraft_core::{Content, Note, NoteMetadata, Topic};
use notecraft_generators::NoteGenerator;
use notecraft_server::{AppState, create_router};
use notecraft_storage::{FileSystemNoteStorage, NoteStorage};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

struct Harness {
    _temp: TempDir,
    config: NotecraftConfig,
    router: axum::Router,
}

/// Bundled configuration (no API keys) writing under a temp dir.
fn harness() -> anyhow::Result<Harness> {
    let temp = TempDir::new()?;
    let mut config = NotecraftConfig::bundled()?;
    config.output.content_dir = temp.path().join("content");
    config.output.image_dir = temp.path().join("images");
    let generator = Arc::new(NoteGenerator::from_config(&config)?);
    Ok(Harness {
        _temp: temp,
        config,
        router: create_router(AppState::new(generator)),
    })
}

async fn send(router: axum::Router, request: Request<Body>) -> anyhow::Result<(StatusCode, String)> {
    let response = router.oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, String::from_utf8(bytes.to_vec())?))
}

fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().uri(uri).body(Body::empty())?)
}

fn post_form(uri: &str, form: &'static str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(Body::from(form))?)
}

#[tokio::test]
async fn test_health() -> anyhow::Result<()> {
    let h = harness()?;
    let (status, body) = send(h.router, get("/health")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");
    Ok(())
}

#[tokio::test]
async fn test_index_shows_forms_with_defaults() -> anyhow::Result<()> {
    let h = harness()?;
    let (status, body) = send(h.router, get("/")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("action=\"/note\""));
    assert!(body.contains("action=\"/batch\""));
    assert!(body.contains(&h.config.generation.default_category));
    Ok(())
}

#[tokio::test]
async fn test_history_lists_saved_notes_escaped() -> anyhow::Result<()> {
    let h = harness()?;
    let storage = FileSystemNoteStorage::new(&h.config.output.content_dir)?;
    for title in ["older", "<b>newer</b>"] {
        let content = Content::new(Topic::from_title("c", title), title, "body", vec![], "");
        storage
            .save(&Note::new(content, vec![], NoteMetadata::new("s", "deepseek", None, 0)))
            .await?;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    }

    let (status, body) = send(h.router.clone(), get("/history")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("<b>newer</b>"));
    let newer = body.find("&lt;b&gt;newer&lt;/b&gt;").unwrap_or(usize::MAX);
    let older = body.find("older").unwrap_or(0);
    assert!(newer < older, "newest note first");

    let (_, limited) = send(h.router, get("/history?limit=1")?).await?;
    assert!(!limited.contains("older"));
    Ok(())
}

#[tokio::test]
async fn test_empty_history() -> anyhow::Result<()> {
    let h = harness()?;
    let (status, body) = send(h.router, get("/history")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("No saved notes yet."));
    Ok(())
}

#[tokio::test]
async fn test_content_requires_topic() -> anyhow::Result<()> {
    let h = harness()?;
    let (status, body) = send(h.router, post_form("/content", "topic=+&style=x")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("topic is required"));
    Ok(())
}

#[tokio::test]
async fn test_missing_api_key_is_bad_request() -> anyhow::Result<()> {
    let h = harness()?;
    let (status, body) = send(h.router, post_form("/topics", "category=%E7%BE%8E%E9%A3%9F&count=2")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("api_key"));
    Ok(())
}

#[tokio::test]
async fn test_unknown_provider_is_bad_request() -> anyhow::Result<()> {
    let h = harness()?;
    let (status, body) = send(
        h.router,
        post_form("/note", "topic=x&content_provider=%3Cevil%3E")?,
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("&lt;evil&gt;"));
    assert!(!body.contains("<evil>"));
    Ok(())
}

#[tokio::test]
async fn test_invalid_number_is_bad_request() -> anyhow::Result<()> {
    let h = harness()?;
    let (status, body) = send(h.router, post_form("/image", "prompt=sunset&width=wide")?).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("width"));
    Ok(())
}
