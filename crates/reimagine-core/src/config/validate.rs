//! Configuration validation with range checks.

use crate::error::ConfigError;
use std::path::Path;

use super::Config;

const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api.base_url.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "api.base_url must not be empty".into(),
            ));
        }
        if self.vision.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "vision.model must not be empty".into(),
            ));
        }
        if self.vision.max_tokens == 0 {
            return Err(ConfigError::ValidationError(
                "vision.max_tokens must be > 0".into(),
            ));
        }
        if self.vision.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "vision.timeout_ms must be > 0".into(),
            ));
        }
        if self.generation.model.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "generation.model must not be empty".into(),
            ));
        }
        if self.generation.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "generation.timeout_ms must be > 0".into(),
            ));
        }
        if self.download.timeout_ms == 0 {
            return Err(ConfigError::ValidationError(
                "download.timeout_ms must be > 0".into(),
            ));
        }
        if self.download.max_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "download.max_size_mb must be > 0".into(),
            ));
        }
        if self.limits.max_file_size_mb == 0 {
            return Err(ConfigError::ValidationError(
                "limits.max_file_size_mb must be > 0".into(),
            ));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        let name = Path::new(&self.output.file_name);
        if self.output.file_name.is_empty()
            || name.file_name().map(|n| n != name.as_os_str()).unwrap_or(true)
        {
            return Err(ConfigError::ValidationError(
                "output.file_name must be a bare file name".into(),
            ));
        }
        Ok(())
    }
}
