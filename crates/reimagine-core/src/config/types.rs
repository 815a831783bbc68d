//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// API credential and endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Base URL both endpoints hang off
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: "${OPENAI_API_KEY}".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }
}

/// Vision (describe) call settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Vision-capable chat model
    pub model: String,

    /// Instruction sent alongside the image
    pub prompt: String,

    /// Upper bound on generated tokens
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            prompt: "Please describe the contents of the image?".to_string(),
            max_tokens: 200,
            timeout_ms: 60_000,
        }
    }
}

/// Output resolution for generated images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageSize {
    /// 1024x1024
    #[default]
    #[serde(rename = "1024x1024")]
    Square,
    /// 1792x1024 widescreen
    #[serde(rename = "1792x1024")]
    Landscape,
    /// 1024x1792 portrait
    #[serde(rename = "1024x1792")]
    Portrait,
}

impl ImageSize {
    /// Wire value for the `size` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageSize::Square => "1024x1024",
            ImageSize::Landscape => "1792x1024",
            ImageSize::Portrait => "1024x1792",
        }
    }
}

/// Rendering quality tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    Standard,
    #[default]
    Hd,
}

impl ImageQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageQuality::Standard => "standard",
            ImageQuality::Hd => "hd",
        }
    }
}

/// Stylistic preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStyle {
    /// Hyper-real, dramatic colors
    #[default]
    Vivid,
    /// More photographic, less saturated
    Natural,
}

impl ImageStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStyle::Vivid => "vivid",
            ImageStyle::Natural => "natural",
        }
    }
}

/// Image-generation call settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Text-to-image model
    pub model: String,

    /// Output resolution
    pub size: ImageSize,

    /// Quality tier
    pub quality: ImageQuality,

    /// Style preset
    pub style: ImageStyle,

    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "dall-e-3".to_string(),
            size: ImageSize::default(),
            quality: ImageQuality::default(),
            style: ImageStyle::default(),
            timeout_ms: 120_000,
        }
    }
}

/// Where downloaded images land.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory (supports ~)
    pub dir: PathBuf,

    /// Base file name; collisions get a numeric suffix
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            file_name: "dall.png".to_string(),
        }
    }
}

/// Download settings for the generated image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DownloadConfig {
    /// Request timeout in milliseconds
    pub timeout_ms: u64,

    /// Largest image body accepted, in megabytes
    pub max_size_mb: u64,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 60_000,
            max_size_mb: 50,
        }
    }
}

impl DownloadConfig {
    pub fn max_bytes(&self) -> u64 {
        self.max_size_mb * 1024 * 1024
    }
}

/// Resource limits for the input image.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum input file size in megabytes
    pub max_file_size_mb: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 20,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug or trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
