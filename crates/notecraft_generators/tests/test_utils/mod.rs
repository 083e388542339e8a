//! Scripted providers and a temp-dir pipeline for generator tests.

#![allow(dead_code)]

use async_trait::async_trait;
use notecraft_config::NotecraftConfig;
use notecraft_core::{GeneratedImage, ImageParams, TextParams};
use notecraft_error::{ConfigError, NotecraftResult, ProviderError, ProviderErrorKind};
use notecraft_generators::NoteGenerator;
use notecraft_interface::{ImageGeneration, Provider, ProviderCatalog, TextGeneration};
use notecraft_storage::{FileSystemImageStorage, FileSystemNoteStorage};
use std::collections::{HashSet, VecDeque};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEXT: &str = "mock-text";
pub const IMAGE: &str = "mock-image";

/// A terminal provider error.
pub fn rejected() -> notecraft_error::NotecraftError {
    ProviderError::new(ProviderErrorKind::Http {
        status_code: 401,
        message: "invalid api key".to_string(),
    })
    .into()
}

/// Text provider answering from a queue of scripted responses.
#[derive(Default)]
pub struct MockText {
    responses: Mutex<VecDeque<NotecraftResult<String>>>,
    prompts: Mutex<Vec<String>>,
    system_prompts: Mutex<Vec<Option<String>>>,
}

impl MockText {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, response: impl Into<String>) -> &Self {
        self.lock_responses().push_back(Ok(response.into()));
        self
    }

    pub fn push_err(&self) -> &Self {
        self.lock_responses().push_back(Err(rejected()));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn system_prompts(&self) -> Vec<Option<String>> {
        self.system_prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<NotecraftResult<String>>> {
        self.responses.lock().unwrap()
    }
}

#[async_trait]
impl Provider for MockText {
    fn provider_name(&self) -> &str {
        TEXT
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[async_trait]
impl TextGeneration for MockText {
    async fn generate_text(&self, prompt: &str, params: &TextParams) -> NotecraftResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.system_prompts
            .lock()
            .unwrap()
            .push(params.system_prompt.clone());
        self.lock_responses().pop_front().unwrap_or_else(|| {
            Err(ProviderError::new(ProviderErrorKind::MalformedResponse(
                "no scripted response left".to_string(),
            ))
            .into())
        })
    }
}

/// Image provider returning a PNG, failing on selected calls.
#[derive(Default)]
pub struct MockImage {
    fail_on: HashSet<usize>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl MockImage {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Fails the listed zero-based calls.
    pub fn failing_on(calls: &[usize]) -> Arc<Self> {
        Arc::new(Self {
            fail_on: calls.iter().copied().collect(),
            ..Self::default()
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockImage {
    fn provider_name(&self) -> &str {
        IMAGE
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

#[async_trait]
impl ImageGeneration for MockImage {
    async fn generate_image(&self, prompt: &str, _params: &ImageParams) -> NotecraftResult<GeneratedImage> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        if self.fail_on.contains(&call) {
            return Err(ProviderError::new(ProviderErrorKind::TaskFailed(format!(
                "scripted failure on call {}",
                call
            )))
            .into());
        }
        Ok(GeneratedImage::new(
            b"\x89PNG\r\n\x1a\nmock".to_vec(),
            Some(format!("https://cdn.example.com/{}.png", call)),
        ))
    }
}

/// Catalog holding one scripted text and one scripted image provider.
pub struct MockCatalog {
    text: Arc<MockText>,
    image: Arc<MockImage>,
}

#[async_trait]
impl ProviderCatalog for MockCatalog {
    fn text(&self, name: &str) -> NotecraftResult<Arc<dyn TextGeneration>> {
        if name == TEXT {
            Ok(self.text.clone())
        } else {
            Err(ConfigError::new(format!("Unknown provider '{}'", name)).into())
        }
    }

    fn image(&self, name: &str) -> NotecraftResult<Arc<dyn ImageGeneration>> {
        if name == IMAGE {
            Ok(self.image.clone())
        } else {
            Err(ConfigError::new(format!("Unknown provider '{}'", name)).into())
        }
    }
}

/// Bundled configuration pointed at the scripted providers.
pub fn config(root: &Path) -> NotecraftConfig {
    let mut config = NotecraftConfig::bundled().expect("bundled config parses");
    config.generation.content_provider = TEXT.to_string();
    config.generation.image_provider = IMAGE.to_string();
    config.generation.default_category = "生活方式".to_string();
    config.generation.default_style = "生活分享".to_string();
    config.generation.default_image_count = 1;
    config.output.content_dir = root.join("content");
    config.output.image_dir = root.join("images");
    config
}

/// Orchestrator over the scripted providers, writing under `root`.
pub fn pipeline(config: &NotecraftConfig, text: &Arc<MockText>, image: &Arc<MockImage>) -> NoteGenerator {
    let catalog = MockCatalog {
        text: Arc::clone(text),
        image: Arc::clone(image),
    };
    NoteGenerator::new(
        config,
        Arc::new(catalog),
        Arc::new(FileSystemNoteStorage::new(&config.output.content_dir).expect("content dir")),
        Arc::new(FileSystemImageStorage::new(&config.output.image_dir).expect("image dir")),
    )
}

/// Files in `dir`, sorted by name.
pub fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// A numbered topic list in the bundled prompt's format.
pub fn topic_list(titles: &[&str]) -> String {
    titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            format!(
                "{}. 标题：{}\n描述：关于{}的分享\n标签：日常, 分享\n",
                i + 1,
                title,
                title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// A post in the bundled prompt's format.
pub fn post(title: &str) -> String {
    format!(
        "标题：{}\n正文：\n第一段。\n\n第二段。\n话题标签：#日常 #分享\n互动引导：评论区聊聊",
        title
    )
}
