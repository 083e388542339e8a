//! Image generation and storage.

use derive_getters::Getters;
use notecraft_config::{PromptTemplate, PromptTemplates};
use notecraft_core::{Content, ImageParams, ImageResult, ScriptFilter};
use notecraft_error::NotecraftResult;
use notecraft_interface::ImageGeneration;
use notecraft_storage::ImageStorage;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Characters of a body paragraph used as an image subject.
const EXCERPT_CHARS: usize = 24;

/// Appended to the title once the body runs out of paragraphs.
const FRAMINGS: [&str; 3] = ["细节特写", "生活场景", "氛围感构图"];

/// Outcome of a multi-image request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Getters)]
pub struct ImageBatch {
    /// Images that were generated and saved, in request order
    images: Vec<ImageResult>,
    /// Requests that failed
    failures: usize,
}

impl ImageBatch {
    /// Consumes the batch, returning the saved images.
    pub fn into_images(self) -> Vec<ImageResult> {
        self.images
    }
}

/// Produces images through one provider and saves them.
#[derive(Clone)]
pub struct ImageGenerator {
    image: Arc<dyn ImageGeneration>,
    storage: Arc<dyn ImageStorage>,
    template: PromptTemplate,
    filter: ScriptFilter,
}

impl std::fmt::Debug for ImageGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageGenerator")
            .field("provider", &self.image.provider_name())
            .field("filter", &self.filter)
            .finish()
    }
}

impl ImageGenerator {
    /// Creates a generator using the `image_generation` template.
    pub fn new(
        image: Arc<dyn ImageGeneration>,
        storage: Arc<dyn ImageStorage>,
        prompts: &PromptTemplates,
        filter: ScriptFilter,
    ) -> Self {
        Self {
            image,
            storage,
            template: prompts.image_generation.clone(),
            filter,
        }
    }

    /// Name of the provider behind this generator.
    pub fn provider_name(&self) -> &str {
        self.image.provider_name()
    }

    /// Image prompt for a post title.
    ///
    /// The title is reduced to the configured script first. A title with
    /// nothing left after filtering is used with whitespace collapsed only.
    pub fn prompt_for(&self, title: &str) -> String {
        let mut kept = self.filter.apply(title);
        if kept.is_empty() {
            debug!(filter = %self.filter, "Title has no characters in the target script");
            kept = ScriptFilter::Any.apply(title);
        }
        self.template.render(&[("title", kept.as_str())])
    }

    /// One image prompt per image for a post.
    ///
    /// The first illustrates the title and the following ones take the body's
    /// paragraphs in order. Past the last paragraph the title is reused with
    /// a framing hint.
    pub fn prompts_for(&self, content: &Content, count: usize) -> Vec<String> {
        let paragraphs = content
            .body()
            .lines()
            .map(|line| line.trim().chars().take(EXCERPT_CHARS).collect::<String>())
            .filter(|line| !line.is_empty());
        let framings = FRAMINGS
            .iter()
            .cycle()
            .map(|framing| format!("{} {}", content.title(), framing));

        std::iter::once(content.title().to_string())
            .chain(paragraphs)
            .chain(framings)
            .take(count)
            .map(|subject| self.prompt_for(&subject))
            .collect()
    }

    /// Generates `count` images illustrating a post, each from its own prompt.
    pub async fn generate_for_content(
        &self,
        content: &Content,
        params: &ImageParams,
        count: usize,
    ) -> ImageBatch {
        let prompts = self.prompts_for(content, count);
        self.generate_each(&prompts, params).await
    }

    /// Generates `count` images for a prompt used as is.
    pub async fn generate(&self, prompt: &str, params: &ImageParams, count: usize) -> ImageBatch {
        self.generate_each(&vec![prompt.to_string(); count], params).await
    }

    /// Generates one image per prompt, each used as is.
    ///
    /// Requests run one after another. Failures are logged and counted;
    /// they never abort the remaining requests.
    #[instrument(skip(self, prompts, params), fields(provider = %self.image.provider_name(), count = prompts.len()))]
    pub async fn generate_each(&self, prompts: &[String], params: &ImageParams) -> ImageBatch {
        let mut batch = ImageBatch::default();
        for (index, prompt) in prompts.iter().enumerate() {
            match self.generate_one(prompt, params).await {
                Ok(image) => batch.images.push(image),
                Err(e) => {
                    warn!(index, error = %e, "Image generation failed");
                    batch.failures += 1;
                }
            }
        }
        info!(saved = batch.images.len(), failed = batch.failures, "Generated images");
        batch
    }

    async fn generate_one(&self, prompt: &str, params: &ImageParams) -> NotecraftResult<ImageResult> {
        let provider = self.image.provider_name();
        let image = self.image.generate_image(prompt, params).await?;
        let path = self.storage.store(provider, &image).await?;
        Ok(ImageResult::new(
            prompt,
            path,
            params.width,
            params.height,
            provider,
            image.source_url().clone(),
        ))
    }
}
