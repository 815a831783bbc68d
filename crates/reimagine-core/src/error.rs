//! Error types for the reimagine pipeline.
//!
//! Errors are organized by stage so the CLI can print an actionable message
//! (status code, raw payload, file path) before exiting.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// No API key in the environment, `.env` file, or config file
    #[error("OPENAI_API_KEY not found in environment variables, .env file, or config file")]
    MissingApiKey,
}

/// Pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Input image does not exist
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Input image could not be read
    #[error("Cannot read {path}: {message}")]
    InputRead { path: PathBuf, message: String },

    /// Input image exceeds the size limit
    #[error("File too large: {path} ({size_mb:.1}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: f64,
        max_mb: u64,
    },

    /// Input is not a recognized image format
    #[error("Unsupported format for {path}: {message}")]
    UnsupportedFormat { path: PathBuf, message: String },

    /// Request never produced a response (connect, DNS, timeout)
    #[error("{stage} request failed: {message}")]
    Transport { stage: &'static str, message: String },

    /// Vision endpoint answered with a non-200 status
    #[error("API call failed with status code {status}\n{body}")]
    DescribeStatus { status: u16, body: String },

    /// Vision response had no `choices`
    #[error("'choices' not found in the API response:\n{payload}")]
    MissingChoices { payload: String },

    /// First choice carried no usable text
    #[error("No text description found in the API response.")]
    MissingDescription,

    /// Response body was not the expected JSON shape
    #[error("Malformed {stage} response: {message}")]
    MalformedResponse { stage: &'static str, message: String },

    /// Image-generation endpoint answered with a non-success status
    #[error("Image generation failed with status code {status}\n{body}")]
    GenerateStatus { status: u16, body: String },

    /// Image-generation response had an empty `data` list
    #[error("No image returned by the image generation API")]
    EmptyGeneration,

    /// Generated image descriptor had no valid URL
    #[error("Generated image has no valid URL: {0}")]
    MissingImageUrl(String),

    /// Fetching the generated image failed
    #[error("Download failed for {url}: {message}")]
    Download { url: String, message: String },

    /// Writing the downloaded image failed
    #[error("Failed to save {path}: {message}")]
    Save { path: PathBuf, message: String },
}

impl PipelineError {
    /// HTTP status attached to the error, if the server answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            PipelineError::DescribeStatus { status, .. }
            | PipelineError::GenerateStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
