//! Input image loading: validation, format sniffing and base64 encoding.

use std::path::Path;

use base64::Engine;

use crate::config::LimitsConfig;
use crate::error::{PipelineError, PipelineResult};

/// Image formats the vision endpoint accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Identify the format from the first bytes of the file.
    pub fn sniff(header: &[u8]) -> Option<Self> {
        match header {
            [0xFF, 0xD8, 0xFF, ..] => Some(ImageFormat::Jpeg),
            [0x89, b'P', b'N', b'G', ..] => Some(ImageFormat::Png),
            [b'G', b'I', b'F', b'8', ..] => Some(ImageFormat::Gif),
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => {
                Some(ImageFormat::Webp)
            }
            _ => None,
        }
    }

    pub fn media_type(&self) -> &'static str {
        match self {
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Png => "image/png",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Webp => "image/webp",
        }
    }
}

/// Base64-encoded image ready to embed in a chat request.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Encode raw bytes of a known format.
    pub fn from_bytes(bytes: &[u8], format: ImageFormat) -> Self {
        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: format.media_type().to_string(),
        }
    }

    /// Read and encode an image file.
    ///
    /// Checks:
    /// - File exists and is readable
    /// - File size is within limits
    /// - File has valid image magic bytes
    pub fn load(path: &Path, limits: &LimitsConfig) -> PipelineResult<Self> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }

        let metadata = std::fs::metadata(path).map_err(|e| PipelineError::InputRead {
            path: path.to_path_buf(),
            message: format!("Cannot read metadata: {e}"),
        })?;

        let max_bytes = limits.max_file_size_mb * 1024 * 1024;
        if metadata.len() > max_bytes {
            return Err(PipelineError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb: metadata.len() as f64 / (1024.0 * 1024.0),
                max_mb: limits.max_file_size_mb,
            });
        }

        let bytes = std::fs::read(path).map_err(|e| PipelineError::InputRead {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let format = ImageFormat::sniff(&bytes).ok_or_else(|| PipelineError::UnsupportedFormat {
            path: path.to_path_buf(),
            message: "expected JPEG, PNG, GIF or WebP (invalid magic bytes)".to_string(),
        })?;

        tracing::debug!(
            "Loaded {:?} ({} bytes, {})",
            path,
            bytes.len(),
            format.media_type()
        );

        Ok(Self::from_bytes(&bytes, format))
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}
