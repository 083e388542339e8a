//! Note orchestration: topic, content, images, persistence.

use crate::{ContentGenerator, ImageBatch, ImageGenerator, TopicGenerator};
use derive_getters::Getters;
use notecraft_config::{GenerationConfig, NotecraftConfig, PromptTemplates};
use notecraft_core::{Content, ImageParams, Note, NoteMetadata, Topic};
use notecraft_error::{ConfigError, NotecraftResult};
use notecraft_interface::ProviderCatalog;
use notecraft_models::ProviderRegistry;
use notecraft_storage::{FileSystemImageStorage, FileSystemNoteStorage, ImageStorage, NoteStorage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// What to generate. Unset or blank fields fall back to `[generation]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteRequest {
    /// Topic title; generated from the category when absent
    #[serde(default)]
    pub topic: Option<String>,
    /// Topic category
    #[serde(default)]
    pub category: Option<String>,
    /// Writing style label
    #[serde(default)]
    pub style: Option<String>,
    /// Text provider name
    #[serde(default)]
    pub content_provider: Option<String>,
    /// Image provider name
    #[serde(default)]
    pub image_provider: Option<String>,
    /// Images per note
    #[serde(default)]
    pub image_count: Option<usize>,
    /// Prompts sent as is, one image each, instead of prompts derived from
    /// the content; capped at the image count
    #[serde(default)]
    pub image_prompts: Option<Vec<String>>,
}

impl NoteRequest {
    /// Custom image prompts with blanks dropped, or `None` when none remain.
    pub fn custom_image_prompts(&self) -> Option<Vec<String>> {
        let prompts: Vec<String> = self
            .image_prompts
            .iter()
            .flatten()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect();
        Some(prompts).filter(|p| !p.is_empty())
    }
}

/// One batch item that produced no note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct BatchFailure {
    /// Position of the item in the topic list
    index: usize,
    /// Title of the topic the item was written for
    topic: String,
    /// Error of the last attempt
    message: String,
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Default, Serialize, Getters)]
pub struct BatchReport {
    /// Notes requested
    requested: usize,
    /// Notes produced, in topic order
    notes: Vec<Note>,
    /// Items that failed
    failures: Vec<BatchFailure>,
    /// Why no topics were available, when topic generation failed
    topic_error: Option<String>,
}

impl BatchReport {
    /// Number of notes produced.
    pub fn succeeded(&self) -> usize {
        self.notes.len()
    }

    /// Number of items that failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

/// Outcome of writing content for a list of generated topics.
#[derive(Debug, Clone, Default, Serialize, Getters)]
pub struct ContentReport {
    /// Content written, in topic order
    contents: Vec<Content>,
    /// Topics that got no content
    failures: Vec<BatchFailure>,
}

/// Generators resolved for one request.
struct Plan {
    category: String,
    style: String,
    topics: TopicGenerator,
    content: ContentGenerator,
    images: Option<ImageGenerator>,
    image_count: usize,
    image_prompts: Option<Vec<String>>,
}

/// `value` when set and not blank, otherwise `default`.
fn pick(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

/// Runs the full generation pipeline and persists its results.
///
/// Providers are resolved by name through a [`ProviderCatalog`] for every
/// request, so each request may pick its own providers. Unknown providers
/// fail as configuration errors before anything is generated.
pub struct NoteGenerator {
    providers: Arc<dyn ProviderCatalog>,
    notes: Arc<dyn NoteStorage>,
    images: Arc<dyn ImageStorage>,
    prompts: PromptTemplates,
    defaults: GenerationConfig,
}

impl std::fmt::Debug for NoteGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteGenerator")
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

impl NoteGenerator {
    /// Creates an orchestrator over the given providers and storage.
    pub fn new(
        config: &NotecraftConfig,
        providers: Arc<dyn ProviderCatalog>,
        notes: Arc<dyn NoteStorage>,
        images: Arc<dyn ImageStorage>,
    ) -> Self {
        Self {
            providers,
            notes,
            images,
            prompts: config.prompts.clone(),
            defaults: config.generation.clone(),
        }
    }

    /// Creates an orchestrator with configured providers and filesystem storage.
    ///
    /// # Errors
    ///
    /// Returns a storage error if an output directory cannot be created.
    pub fn from_config(config: &NotecraftConfig) -> NotecraftResult<Self> {
        let notes = FileSystemNoteStorage::new(&config.output.content_dir)?;
        let images = FileSystemImageStorage::new(&config.output.image_dir)?;
        Ok(Self::new(
            config,
            Arc::new(ProviderRegistry::new(config)),
            Arc::new(notes),
            Arc::new(images),
        ))
    }

    /// Defaults applied to unset request fields.
    pub fn defaults(&self) -> &GenerationConfig {
        &self.defaults
    }

    /// Storage the notes are saved to.
    pub fn notes(&self) -> &Arc<dyn NoteStorage> {
        &self.notes
    }

    /// Topic generator for `provider`, or the default content provider.
    pub fn topic_generator(&self, provider: Option<&str>) -> NotecraftResult<TopicGenerator> {
        let name = pick(provider, &self.defaults.content_provider);
        Ok(TopicGenerator::new(self.providers.text(&name)?, &self.prompts))
    }

    /// Content generator for `provider`, or the default content provider.
    pub fn content_generator(&self, provider: Option<&str>) -> NotecraftResult<ContentGenerator> {
        let name = pick(provider, &self.defaults.content_provider);
        Ok(ContentGenerator::new(self.providers.text(&name)?, &self.prompts))
    }

    /// Image generator for `provider`, or the default image provider.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when neither names a provider.
    pub fn image_generator(&self, provider: Option<&str>) -> NotecraftResult<ImageGenerator> {
        let name = pick(provider, &self.defaults.image_provider);
        if name.is_empty() {
            return Err(ConfigError::new("No image provider given and generation.image_provider is empty").into());
        }
        Ok(ImageGenerator::new(
            self.providers.image(&name)?,
            Arc::clone(&self.images),
            &self.prompts,
            self.defaults.script_filter,
        ))
    }

    /// Generates topics, falling back to the default category and count.
    pub async fn generate_topics(
        &self,
        category: Option<&str>,
        count: Option<usize>,
        provider: Option<&str>,
    ) -> NotecraftResult<Vec<Topic>> {
        let category = pick(category, &self.defaults.default_category);
        let count = count.unwrap_or(self.defaults.default_topic_count);
        self.topic_generator(provider)?
            .generate_topics(&category, count)
            .await
    }

    /// Writes content for a topic title, without saving it.
    pub async fn generate_content(
        &self,
        topic: &str,
        category: Option<&str>,
        style: Option<&str>,
        provider: Option<&str>,
    ) -> NotecraftResult<Content> {
        let topic = Topic::from_title(pick(category, &self.defaults.default_category), topic.trim());
        let style = pick(style, &self.defaults.default_style);
        self.content_generator(provider)?
            .generate_content(&topic, &style)
            .await
    }

    /// Generates images for a prompt used as is.
    pub async fn generate_images(
        &self,
        prompt: &str,
        provider: Option<&str>,
        params: &ImageParams,
        count: usize,
    ) -> NotecraftResult<ImageBatch> {
        Ok(self.image_generator(provider)?.generate(prompt, params, count).await)
    }

    fn plan(&self, request: &NoteRequest) -> NotecraftResult<Plan> {
        let topics = self.topic_generator(request.content_provider.as_deref())?;
        let content = self.content_generator(request.content_provider.as_deref())?;
        let image_count = request
            .image_count
            .unwrap_or(self.defaults.default_image_count);
        let image_provider = pick(request.image_provider.as_deref(), &self.defaults.image_provider);
        let images = if image_count > 0 && !image_provider.is_empty() {
            Some(self.image_generator(Some(&image_provider))?)
        } else {
            None
        };

        Ok(Plan {
            category: pick(request.category.as_deref(), &self.defaults.default_category),
            style: pick(request.style.as_deref(), &self.defaults.default_style),
            topics,
            content,
            images,
            image_count,
            image_prompts: request.custom_image_prompts(),
        })
    }

    /// Generates, assembles and saves one note.
    ///
    /// Without a topic, one is generated for the category; if that fails the
    /// category itself is used as the topic title. Image failures are
    /// recorded in the note's metadata. Only content and storage failures
    /// fail the call, and nothing is saved when they do.
    #[instrument(skip(self, request), fields(topic = ?request.topic, category = ?request.category))]
    pub async fn generate_note(&self, request: &NoteRequest) -> NotecraftResult<Note> {
        let plan = self.plan(request)?;

        let topic = match request.topic.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => Topic::from_title(&plan.category, title),
            None => match plan.topics.generate_topics(&plan.category, 1).await {
                Ok(topics) => topics.into_iter().next().unwrap_or_else(|| {
                    warn!(category = %plan.category, "No topic parsed, using the category as topic");
                    Topic::from_title(&plan.category, &plan.category)
                }),
                Err(e) => {
                    warn!(category = %plan.category, error = %e, "Topic generation failed, using the category as topic");
                    Topic::from_title(&plan.category, &plan.category)
                }
            },
        };

        self.assemble(&plan, topic).await
    }

    async fn assemble(&self, plan: &Plan, topic: Topic) -> NotecraftResult<Note> {
        let content = plan.content.generate_content(&topic, &plan.style).await?;

        let (images, failures, image_provider) = match &plan.images {
            Some(generator) => {
                let params = ImageParams::default();
                let batch = match &plan.image_prompts {
                    Some(prompts) => {
                        let take = prompts.len().min(plan.image_count);
                        generator.generate_each(&prompts[..take], &params).await
                    }
                    None => {
                        generator
                            .generate_for_content(&content, &params, plan.image_count)
                            .await
                    }
                };
                let failures = *batch.failures();
                if failures > 0 {
                    warn!(failed = failures, "Some images could not be generated");
                }
                (batch.into_images(), failures, Some(generator.provider_name().to_string()))
            }
            None => (Vec::new(), 0, None),
        };

        let metadata = NoteMetadata::new(
            &plan.style,
            plan.content.provider_name(),
            image_provider,
            failures,
        );
        let note = Note::new(content, images, metadata);
        self.notes.save(&note).await?;
        info!(id = %note.id(), title = %note.title(), images = note.images().len(), "Generated note");
        Ok(note)
    }

    /// Generates `count` topics, then one note per topic.
    ///
    /// Items run one after another in topic order. A failed item is retried
    /// `generation.item_retries` times, then recorded in the report; it never
    /// stops the batch. When topic generation itself fails the report is
    /// empty and carries the error. `request.topic` is ignored.
    ///
    /// # Errors
    ///
    /// Only configuration errors (such as an unknown provider) fail the call.
    #[instrument(skip(self, request))]
    pub async fn batch_generate_notes(
        &self,
        count: usize,
        request: &NoteRequest,
    ) -> NotecraftResult<BatchReport> {
        let plan = self.plan(request)?;
        let mut report = BatchReport {
            requested: count,
            ..BatchReport::default()
        };

        let topics = match plan.topics.generate_topics(&plan.category, count).await {
            Ok(topics) => topics,
            Err(e) => {
                error!(category = %plan.category, error = %e, "Topic generation failed, batch is empty");
                report.topic_error = Some(e.to_string());
                return Ok(report);
            }
        };

        let attempts = self.defaults.item_retries + 1;
        for (index, topic) in topics.into_iter().enumerate() {
            let mut last_error = None;
            for attempt in 1..=attempts {
                match self.assemble(&plan, topic.clone()).await {
                    Ok(note) => {
                        report.notes.push(note);
                        last_error = None;
                        break;
                    }
                    Err(e) => {
                        warn!(index, attempt, topic = %topic.title(), error = %e, "Batch item failed");
                        last_error = Some(e);
                    }
                }
            }
            if let Some(e) = last_error {
                report.failures.push(BatchFailure {
                    index,
                    topic: topic.title().clone(),
                    message: e.to_string(),
                });
            }
        }

        info!(
            requested = report.requested,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Batch finished"
        );
        Ok(report)
    }

    /// Generates topics, then content for each, without saving notes.
    ///
    /// Topic generation failure fails the call; per-topic content failures
    /// are recorded and skipped.
    #[instrument(skip(self))]
    pub async fn generate_topic_contents(
        &self,
        category: Option<&str>,
        count: Option<usize>,
        style: Option<&str>,
        provider: Option<&str>,
    ) -> NotecraftResult<ContentReport> {
        let style = pick(style, &self.defaults.default_style);
        let writer = self.content_generator(provider)?;
        let topics = self.generate_topics(category, count, provider).await?;

        let mut report = ContentReport::default();
        for (index, topic) in topics.iter().enumerate() {
            match writer.generate_content(topic, &style).await {
                Ok(content) => report.contents.push(content),
                Err(e) => {
                    warn!(index, topic = %topic.title(), error = %e, "Content generation failed");
                    report.failures.push(BatchFailure {
                        index,
                        topic: topic.title().clone(),
                        message: e.to_string(),
                    });
                }
            }
        }
        Ok(report)
    }

    /// Releases every provider session opened so far.
    pub async fn release(&self) {
        self.providers.release_all().await;
    }
}
