//! Image description via the OpenAI Chat Completions API.
//!
//! Sends the image as a data URL in the user message content array and
//! validates the reply into a non-empty [`Description`].

use crate::config::{ApiKey, VisionConfig};
use crate::error::{PipelineError, PipelineResult};
use crate::input::ImageInput;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

/// Non-empty text produced by the vision model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description(String);

impl Description {
    /// Keeps `text` as-is; `None` if it is empty or only whitespace.
    pub fn new(text: &str) -> Option<Self> {
        (!text.trim().is_empty()).then(|| Self(text.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated vision reply.
#[derive(Debug, Clone)]
pub struct VisionReply {
    /// Extracted description
    pub description: Description,
    /// Full response body, echoed for diagnostics
    pub raw_response: String,
    /// Model identifier reported by the API
    pub model: Option<String>,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Anything that can turn an image into a description.
///
/// Uses `async_trait` so the pipeline can hold a `Box<dyn Describer>`.
#[async_trait]
pub trait Describer: Send + Sync {
    /// Name for logging.
    fn name(&self) -> &str;

    /// Describe the given image.
    async fn describe(&self, image: &ImageInput) -> PipelineResult<VisionReply>;
}

/// Describer backed by an OpenAI-compatible chat completions endpoint.
pub struct OpenAiDescriber {
    api_key: ApiKey,
    model: String,
    prompt: String,
    max_tokens: u32,
    timeout: Duration,
    client: reqwest::Client,
    endpoint: String,
}

impl OpenAiDescriber {
    pub fn new(api_key: ApiKey, base_url: &str, config: &VisionConfig) -> Self {
        Self {
            api_key,
            model: config.model.clone(),
            prompt: config.prompt.clone(),
            max_tokens: config.max_tokens,
            timeout: Duration::from_millis(config.timeout_ms),
            client: reqwest::Client::new(),
            endpoint: format!("{}/chat/completions", base_url.trim_end_matches('/')),
        }
    }

    fn request_body(&self, image: &ImageInput) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: vec![
                    ChatContent::Text {
                        text: self.prompt.clone(),
                    },
                    ChatContent::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_url(),
                        },
                    },
                ],
            }],
        }
    }
}

// --- Request types ---

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: Vec<ChatContent>,
}

#[derive(Serialize)]
#[serde(tag = "type")]
enum ChatContent {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "image_url")]
    ImageUrl { image_url: ImageUrl },
}

#[derive(Serialize)]
struct ImageUrl {
    url: String,
}

// --- Response types ---

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Option<Vec<Choice>>,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    usage: Option<ChatUsage>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatUsage {
    total_tokens: u32,
}

/// Validate a chat completions reply.
///
/// Anything but 200 is an error carrying the body; a 200 must hold a
/// non-empty `choices` array whose first message has non-empty content.
pub fn parse_chat_response(status: u16, body: &str) -> PipelineResult<VisionReply> {
    if status != 200 {
        return Err(PipelineError::DescribeStatus {
            status,
            body: body.to_string(),
        });
    }

    let chat: ChatResponse =
        serde_json::from_str(body).map_err(|e| PipelineError::MalformedResponse {
            stage: "vision",
            message: e.to_string(),
        })?;

    let choices = match chat.choices {
        Some(choices) if !choices.is_empty() => choices,
        _ => {
            return Err(PipelineError::MissingChoices {
                payload: body.to_string(),
            })
        }
    };

    let description = choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .as_deref()
        .and_then(Description::new)
        .ok_or(PipelineError::MissingDescription)?;

    Ok(VisionReply {
        description,
        raw_response: body.to_string(),
        model: chat.model,
        tokens_used: chat.usage.map(|u| u.total_tokens),
        latency_ms: 0,
    })
}

#[async_trait]
impl Describer for OpenAiDescriber {
    fn name(&self) -> &str {
        "openai"
    }

    async fn describe(&self, image: &ImageInput) -> PipelineResult<VisionReply> {
        let start = Instant::now();
        tracing::info!("Sending request to vision model {}...", self.model);

        let resp = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(&self.request_body(image))
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PipelineError::Transport {
                stage: "vision",
                message: e.to_string(),
            })?;

        let status = resp.status().as_u16();
        let body = resp.text().await.map_err(|e| PipelineError::Transport {
            stage: "vision",
            message: format!("Failed reading response body: {e}"),
        })?;

        let mut reply = parse_chat_response(status, &body)?;
        reply.latency_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "Vision reply from {} in {}ms ({} tokens)",
            reply.model.as_deref().unwrap_or(&self.model),
            reply.latency_ms,
            reply
                .tokens_used
                .map(|t| t.to_string())
                .unwrap_or_else(|| "?".to_string())
        );

        Ok(reply)
    }
}
