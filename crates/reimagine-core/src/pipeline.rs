//! The describe → generate → fetch+save pipeline.
//!
//! Steps run strictly in sequence. Any describe or generate error aborts the
//! run before the next request is issued. A failed download only skips the
//! save step.

use crate::config::{ApiKey, Config, LimitsConfig};
use crate::describe::{Describer, OpenAiDescriber, VisionReply};
use crate::download::{Fetcher, HttpFetcher};
use crate::error::{ConfigError, PipelineError, PipelineResult};
use crate::generate::{GeneratedImage, Generator, OpenAiGenerator};
use crate::input::ImageInput;
use crate::save::save_binary_file;
use std::path::{Path, PathBuf};

/// Progress notifications emitted while the pipeline runs.
#[derive(Debug)]
pub enum PipelineEvent<'a> {
    Describing,
    Described(&'a VisionReply),
    Generating,
    Generated(&'a GeneratedImage),
    Downloading,
    Saved(&'a Path),
    DownloadSkipped(&'a PipelineError),
}

/// What happened to the generated image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Written to this path
    Saved(PathBuf),
    /// Download failed; nothing was written
    DownloadSkipped(String),
}

/// Result of a complete run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub vision: VisionReply,
    pub image: GeneratedImage,
    pub save: SaveOutcome,
}

/// Where and how the pipeline reads input and writes output.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    pub limits: LimitsConfig,
    pub output_dir: PathBuf,
    pub file_name: String,
}

impl PipelineOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            limits: config.limits.clone(),
            output_dir: config.output_dir(),
            file_name: config.output.file_name.clone(),
        }
    }
}

/// Sequential image-to-image pipeline.
pub struct Pipeline {
    describer: Box<dyn Describer>,
    generator: Box<dyn Generator>,
    fetcher: Box<dyn Fetcher>,
    options: PipelineOptions,
}

impl Pipeline {
    pub fn new(
        describer: Box<dyn Describer>,
        generator: Box<dyn Generator>,
        fetcher: Box<dyn Fetcher>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            describer,
            generator,
            fetcher,
            options,
        }
    }

    /// Build the OpenAI-backed pipeline. The key is shared by both clients.
    pub fn from_config(config: &Config, api_key: ApiKey) -> Self {
        let base_url = &config.api.base_url;
        Self::new(
            Box::new(OpenAiDescriber::new(
                api_key.clone(),
                base_url,
                &config.vision,
            )),
            Box::new(OpenAiGenerator::new(api_key, base_url, &config.generation)),
            Box::new(HttpFetcher::new(
                config.download.timeout_ms,
                config.download.max_bytes(),
            )),
            PipelineOptions::from_config(config),
        )
    }

    /// Resolve the credential, then build the pipeline.
    ///
    /// Fails with [`ConfigError::MissingApiKey`] before any client exists, so
    /// no request can be issued without a key.
    pub fn try_from_config(config: &Config, explicit_key: Option<&str>) -> Result<Self, ConfigError> {
        let api_key = config.resolve_api_key(explicit_key)?;
        Ok(Self::from_config(config, api_key))
    }

    /// Step 1 only: load the image and describe it.
    pub async fn describe(&self, image_path: &Path) -> PipelineResult<VisionReply> {
        let image = ImageInput::load(image_path, &self.options.limits)?;
        tracing::debug!("Describing {:?} with {}", image_path, self.describer.name());
        self.describer.describe(&image).await
    }

    /// Run all steps, reporting progress through `on_event`.
    pub async fn run<F>(&self, image_path: &Path, mut on_event: F) -> PipelineResult<RunReport>
    where
        F: FnMut(PipelineEvent<'_>),
    {
        on_event(PipelineEvent::Describing);
        let vision = self.describe(image_path).await?;
        on_event(PipelineEvent::Described(&vision));

        on_event(PipelineEvent::Generating);
        tracing::debug!("Generating with {}", self.generator.name());
        let image = self.generator.generate(&vision.description).await?;
        on_event(PipelineEvent::Generated(&image));

        on_event(PipelineEvent::Downloading);
        let save = match self.fetcher.fetch(&image.url).await {
            Ok(bytes) => {
                let path =
                    save_binary_file(&self.options.output_dir, &self.options.file_name, &bytes)?;
                on_event(PipelineEvent::Saved(&path));
                SaveOutcome::Saved(path)
            }
            Err(e) => {
                tracing::warn!("Skipping save: {e}");
                on_event(PipelineEvent::DownloadSkipped(&e));
                SaveOutcome::DownloadSkipped(e.to_string())
            }
        };

        Ok(RunReport {
            vision,
            image,
            save,
        })
    }
}
