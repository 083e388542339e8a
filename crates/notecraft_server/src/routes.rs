//! Routes and handlers.

use crate::error::WebError;
use crate::render::{self, FormDefaults};
use axum::extract::{Form, Query, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use notecraft_core::ImageParams;
use notecraft_generators::{NoteGenerator, NoteRequest};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;

const DEFAULT_HISTORY_LIMIT: usize = 20;

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    generator: Arc<NoteGenerator>,
}

impl AppState {
    /// Wraps the shared orchestrator.
    pub fn new(generator: Arc<NoteGenerator>) -> Self {
        Self { generator }
    }
}

/// Builds the router with every route.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/history", get(history))
        .route("/topics", post(topics))
        .route("/content", post(content))
        .route("/topic-contents", post(topic_contents))
        .route("/image", post(image))
        .route("/note", post(note))
        .route("/batch", post(batch))
        .with_state(state)
}

type Page = Result<Html<String>, WebError>;

/// Blank form fields count as unset.
fn text(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn number<T: std::str::FromStr>(name: &str, value: &Option<String>) -> Result<Option<T>, WebError> {
    text(value)
        .map(|v| {
            v.parse::<T>()
                .map_err(|_| WebError::invalid(format!("'{}' is not a valid {}", v, name)))
        })
        .transpose()
}

fn required<'a>(name: &str, value: &'a Option<String>) -> Result<&'a str, WebError> {
    text(value).ok_or_else(|| WebError::invalid(format!("{} is required", name)))
}

async fn index(State(state): State<AppState>) -> Html<String> {
    let d = state.generator.defaults();
    Html(render::index_page(&FormDefaults {
        category: d.default_category.clone(),
        style: d.default_style.clone(),
        topic_count: d.default_topic_count,
        image_count: d.default_image_count,
        content_provider: d.content_provider.clone(),
        image_provider: d.image_provider.clone(),
    }))
}

async fn health() -> &'static str {
    "ok"
}

#[derive(Debug, Deserialize)]
struct HistoryQuery {
    limit: Option<String>,
}

async fn history(State(state): State<AppState>, Query(query): Query<HistoryQuery>) -> Page {
    let limit = number("limit", &query.limit)?.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let mut notes = state.generator.notes().list().await?;
    notes.truncate(limit);
    Ok(Html(render::history_page(&notes)))
}

#[derive(Debug, Deserialize)]
struct TopicsForm {
    category: Option<String>,
    count: Option<String>,
    provider: Option<String>,
}

#[instrument(skip_all)]
async fn topics(State(state): State<AppState>, Form(form): Form<TopicsForm>) -> Page {
    let count = number("count", &form.count)?;
    let category = text(&form.category).unwrap_or(&state.generator.defaults().default_category);
    let topics = state
        .generator
        .generate_topics(Some(category), count, text(&form.provider))
        .await?;
    Ok(Html(render::topics_page(category, &topics)))
}

#[derive(Debug, Deserialize)]
struct ContentForm {
    topic: Option<String>,
    category: Option<String>,
    style: Option<String>,
    provider: Option<String>,
}

#[instrument(skip_all)]
async fn content(State(state): State<AppState>, Form(form): Form<ContentForm>) -> Page {
    let topic = required("topic", &form.topic)?;
    let content = state
        .generator
        .generate_content(topic, text(&form.category), text(&form.style), text(&form.provider))
        .await?;
    Ok(Html(render::content_page(&content)))
}

#[derive(Debug, Deserialize)]
struct TopicContentsForm {
    category: Option<String>,
    count: Option<String>,
    style: Option<String>,
    provider: Option<String>,
}

#[instrument(skip_all)]
async fn topic_contents(State(state): State<AppState>, Form(form): Form<TopicContentsForm>) -> Page {
    let count = number("count", &form.count)?;
    let report = state
        .generator
        .generate_topic_contents(text(&form.category), count, text(&form.style), text(&form.provider))
        .await?;
    Ok(Html(render::contents_page(&report)))
}

#[derive(Debug, Deserialize)]
struct ImageForm {
    prompt: Option<String>,
    provider: Option<String>,
    width: Option<String>,
    height: Option<String>,
    count: Option<String>,
}

#[instrument(skip_all)]
async fn image(State(state): State<AppState>, Form(form): Form<ImageForm>) -> Page {
    let prompt = required("prompt", &form.prompt)?;
    let defaults = ImageParams::default();
    let params = ImageParams::new(
        number("width", &form.width)?.unwrap_or(defaults.width),
        number("height", &form.height)?.unwrap_or(defaults.height),
    );
    let count = number("count", &form.count)?.unwrap_or(1);
    let batch = state
        .generator
        .generate_images(prompt, text(&form.provider), &params, count)
        .await?;
    Ok(Html(render::image_page(&batch)))
}

#[derive(Debug, Deserialize)]
struct NoteForm {
    topic: Option<String>,
    category: Option<String>,
    style: Option<String>,
    content_provider: Option<String>,
    image_provider: Option<String>,
    image_count: Option<String>,
    image_prompts: Option<String>,
    count: Option<String>,
}

impl NoteForm {
    fn request(&self) -> Result<NoteRequest, WebError> {
        let owned = |v: &Option<String>| text(v).map(str::to_string);
        Ok(NoteRequest {
            topic: owned(&self.topic),
            category: owned(&self.category),
            style: owned(&self.style),
            content_provider: owned(&self.content_provider),
            image_provider: owned(&self.image_provider),
            image_count: number("image count", &self.image_count)?,
            image_prompts: text(&self.image_prompts)
                .map(|v| v.lines().map(str::to_string).collect()),
        })
    }
}

#[instrument(skip_all)]
async fn note(State(state): State<AppState>, Form(form): Form<NoteForm>) -> Page {
    let note = state.generator.generate_note(&form.request()?).await?;
    Ok(Html(render::note_page(&note)))
}

#[instrument(skip_all)]
async fn batch(State(state): State<AppState>, Form(form): Form<NoteForm>) -> Page {
    let count = number("count", &form.count)?.unwrap_or(state.generator.defaults().default_topic_count);
    let report = state
        .generator
        .batch_generate_notes(count, &form.request()?)
        .await?;
    Ok(Html(render::batch_page(&report)))
}
