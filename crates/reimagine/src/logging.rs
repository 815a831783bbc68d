//! Tracing setup for the CLI.
//!
//! Logs always go to stderr; stdout is reserved for the description, the
//! image URL and the saved path.

use reimagine_core::config::LoggingConfig;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Effective logging settings after CLI flags are layered over the config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: String,
    pub json: bool,
}

impl LogSettings {
    /// `--verbose` forces debug unless the config already asks for trace.
    pub fn resolve(config: &LoggingConfig, verbose: bool, json_logs: bool) -> Self {
        let level = if verbose && config.level != "trace" {
            "debug".to_string()
        } else {
            config.level.clone()
        };
        Self {
            level,
            json: json_logs || config.format == "json",
        }
    }

    /// Filter directive used when RUST_LOG is unset.
    ///
    /// Debug and trace apply to our crates only; HTTP internals stay at info.
    pub fn directive(&self) -> String {
        match self.level.as_str() {
            "debug" | "trace" => format!(
                "reimagine={0},reimagine_core={0},info",
                self.level
            ),
            level => level.to_string(),
        }
    }
}

/// Install the global subscriber. RUST_LOG, when set, wins over `settings`.
pub fn init(settings: &LogSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.directive()));
    let registry = tracing_subscriber::registry().with(filter);

    if settings.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
