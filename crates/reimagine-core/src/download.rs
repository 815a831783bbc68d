//! Fetching the generated image over HTTP.

use crate::error::{PipelineError, PipelineResult};
use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Url;
use std::time::Duration;

/// Anything that can fetch the bytes behind a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> PipelineResult<Vec<u8>>;
}

/// Plain HTTP GET fetcher, streaming the body into memory.
///
/// Bodies larger than `max_bytes` are rejected, whether announced by
/// `Content-Length` or discovered while streaming.
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_bytes: u64,
}

impl HttpFetcher {
    pub fn new(timeout_ms: u64, max_bytes: u64) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout: Duration::from_millis(timeout_ms),
            max_bytes,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> PipelineResult<Vec<u8>> {
        let download_err = |message: String| PipelineError::Download {
            url: url.to_string(),
            message,
        };

        let response = self
            .client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| download_err(e.to_string()))?
            .error_for_status()
            .map_err(|e| download_err(e.to_string()))?;

        let total_size = response.content_length();
        if let Some(size) = total_size {
            tracing::debug!("  Size: {:.1} KB", size as f64 / 1024.0);
            if size > self.max_bytes {
                return Err(download_err(format!(
                    "announced size {size} bytes exceeds limit of {} bytes",
                    self.max_bytes
                )));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| download_err(e.to_string()))?;
            if (bytes.len() + chunk.len()) as u64 > self.max_bytes {
                return Err(download_err(format!(
                    "body exceeds limit of {} bytes",
                    self.max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);

            if let Some(total) = total_size {
                if bytes.len() as u64 % (512 * 1024) < chunk.len() as u64 {
                    tracing::debug!(
                        "  Progress: {:.0}%",
                        bytes.len() as f64 / total as f64 * 100.0
                    );
                }
            }
        }

        if bytes.is_empty() {
            return Err(download_err("empty response body".to_string()));
        }

        tracing::debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes)
    }
}
