//! reimagine core - describe an image, then render a new one from the description.
//!
//! # Architecture
//!
//! A fixed three-step pipeline with a single data handoff between steps:
//!
//! ```text
//! Image → Base64 data URL → Vision model (Description) → Image model (URL) → Download → Save
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use reimagine_core::{Config, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load()?;
//!     let api_key = config.resolve_api_key(None)?;
//!     let pipeline = Pipeline::from_config(&config, api_key);
//!
//!     let report = pipeline.run("./pikachu_0.png".as_ref(), |_| {}).await?;
//!     println!("{}", report.vision.description);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod describe;
pub mod download;
pub mod error;
pub mod generate;
pub mod input;
pub mod pipeline;
pub mod save;

// Re-exports for convenient access
pub use config::{ApiKey, Config};
pub use describe::{Describer, Description, OpenAiDescriber, VisionReply};
pub use download::{Fetcher, HttpFetcher};
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use generate::{GeneratedImage, Generator, OpenAiGenerator};
pub use input::{ImageFormat, ImageInput};
pub use pipeline::{Pipeline, PipelineEvent, PipelineOptions, RunReport, SaveOutcome};
pub use save::save_binary_file;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
