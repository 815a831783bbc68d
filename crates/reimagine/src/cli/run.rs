//! The `reimagine run` command: describe, generate, download, save.

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use reimagine_core::{Config, Pipeline, PipelineEvent};
use std::path::PathBuf;
use std::time::Duration;

use super::types::{Quality, Size, Style};
use super::ApiArgs;

/// Arguments for the `run` command.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Source image (JPEG, PNG, GIF or WebP)
    #[arg(required = true)]
    pub image: PathBuf,

    #[command(flatten)]
    pub api: ApiArgs,

    /// Directory the generated image is saved into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Base file name; an existing file gets a numeric suffix instead of being overwritten
    #[arg(long)]
    pub output_name: Option<String>,

    /// Image generation model
    #[arg(long)]
    pub image_model: Option<String>,

    /// Output resolution
    #[arg(long, value_enum)]
    pub size: Option<Size>,

    /// Quality tier
    #[arg(long, value_enum)]
    pub quality: Option<Quality>,

    /// Style preset
    #[arg(long, value_enum)]
    pub style: Option<Style>,
}

impl RunArgs {
    fn apply(&self, config: &mut Config) {
        self.api.apply(config);
        if let Some(ref dir) = self.output_dir {
            config.output.dir = dir.clone();
        }
        if let Some(ref name) = self.output_name {
            config.output.file_name = name.clone();
        }
        if let Some(ref model) = self.image_model {
            config.generation.model = model.clone();
        }
        if let Some(size) = self.size {
            config.generation.size = size.into();
        }
        if let Some(quality) = self.quality {
            config.generation.quality = quality.into();
        }
        if let Some(style) = self.style {
            config.generation.style = style.into();
        }
    }
}

/// Execute the run command.
pub async fn execute(args: RunArgs, mut config: Config) -> anyhow::Result<()> {
    args.apply(&mut config);
    config.validate()?;

    let pipeline = Pipeline::try_from_config(&config, args.api.api_key.as_deref())?;
    let spinner = create_spinner();

    let result = pipeline
        .run(&args.image, |event| match event {
            PipelineEvent::Describing => {
                spinner.set_message("Sending request to vision model...");
            }
            PipelineEvent::Described(reply) => spinner.suspend(|| {
                println!("{}", reply.description);
                println!("{}", reply.raw_response);
            }),
            PipelineEvent::Generating => spinner.set_message("Generating image..."),
            PipelineEvent::Generated(image) => spinner.suspend(|| println!("{}", image.url)),
            PipelineEvent::Downloading => spinner.set_message("Downloading image..."),
            PipelineEvent::Saved(path) => {
                spinner.suspend(|| println!("Image saved to {}", path.display()));
            }
            PipelineEvent::DownloadSkipped(_) => {}
        })
        .await;

    spinner.finish_and_clear();
    let report = result?;

    tracing::debug!(
        "Described in {}ms; image at {}",
        report.vision.latency_ms,
        report.image.url
    );
    Ok(())
}

fn create_spinner() -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}
