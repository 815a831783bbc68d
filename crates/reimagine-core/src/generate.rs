//! Image generation via the OpenAI Images API.
//!
//! Request body for POST /v1/images/generations, always asking for a single
//! image returned by URL.

use crate::config::{ApiKey, GenerationConfig, ImageQuality, ImageSize, ImageStyle};
use crate::describe::Description;
use crate::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Reference to a remotely hosted generated image.
///
/// The URL is only valid for as long as the remote host serves it.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub url: Url,
    /// Prompt as rewritten by the service, if it reports one
    pub revised_prompt: Option<String>,
}

/// Anything that can render an image from a description.
#[async_trait]
pub trait Generator: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(&self, prompt: &Description) -> PipelineResult<GeneratedImage>;
}

/// Generator backed by an OpenAI-compatible images endpoint.
pub struct OpenAiGenerator {
    api_key: ApiKey,
    model: String,
    size: ImageSize,
    quality: ImageQuality,
    style: ImageStyle,
    timeout: Duration,
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiGenerator {
    pub fn new(api_key: ApiKey, base_url: &str, config: &GenerationConfig) -> Self {
        Self {
            api_key,
            model: config.model.clone(),
            size: config.size,
            quality: config.quality,
            style: config.style,
            timeout: Duration::from_millis(config.timeout_ms),
            client: reqwest::Client::new(),
            endpoint: format!("{}/images/generations", base_url.trim_end_matches('/')),
        }
    }

    fn request_body<'a>(&'a self, prompt: &'a Description) -> ImagesGenerateRequest<'a> {
        ImagesGenerateRequest {
            model: &self.model,
            prompt: prompt.as_str(),
            n: 1,
            size: self.size.as_str(),
            quality: self.quality.as_str(),
            style: self.style.as_str(),
            response_format: "url",
        }
    }
}

#[derive(Serialize, Debug)]
struct ImagesGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'a str,
    quality: &'a str,
    style: &'a str,
    response_format: &'a str,
}

#[derive(Deserialize, Debug)]
struct ImagesGenerateResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize, Debug)]
struct ImageData {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    revised_prompt: Option<String>,
}

/// Validate an images API reply into the first generated image.
pub fn parse_generation_response(status: u16, body: &str) -> PipelineResult<GeneratedImage> {
    if !(200..300).contains(&status) {
        return Err(PipelineError::GenerateStatus {
            status,
            body: body.to_string(),
        });
    }

    let parsed: ImagesGenerateResponse =
        serde_json::from_str(body).map_err(|e| PipelineError::MalformedResponse {
            stage: "image generation",
            message: e.to_string(),
        })?;

    let first = parsed
        .data
        .into_iter()
        .next()
        .ok_or(PipelineError::EmptyGeneration)?;

    let raw_url = first
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| PipelineError::MissingImageUrl("response has no url field".to_string()))?;

    let url = Url::parse(raw_url.trim())
        .map_err(|e| PipelineError::MissingImageUrl(format!("{raw_url}: {e}")))?;

    Ok(GeneratedImage {
        url,
        revised_prompt: first.revised_prompt,
    })
}

#[async_trait]
impl Generator for OpenAiGenerator {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, prompt: &Description) -> PipelineResult<GeneratedImage> {
        tracing::info!(
            "Generating image with {} ({}, {}, {})...",
            self.model,
            self.size.as_str(),
            self.quality.as_str(),
            self.style.as_str()
        );

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&self.request_body(prompt))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PipelineError::Transport {
                stage: "image generation",
                message: e.to_string(),
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| PipelineError::Transport {
            stage: "image generation",
            message: format!("Failed reading response body: {e}"),
        })?;

        let image = parse_generation_response(status, &body)?;
        if let Some(ref revised) = image.revised_prompt {
            tracing::info!("Revised prompt: {revised}");
        }
        Ok(image)
    }
}
