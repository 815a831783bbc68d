//! CLI command implementations.

pub mod config;
pub mod describe;
pub mod run;
pub mod types;

use clap::Args;
use reimagine_core::Config;

/// Flags shared by every command that talks to the vision endpoint.
#[derive(Args, Debug, Default)]
pub struct ApiArgs {
    /// OpenAI API key (also read from a .env file)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long)]
    pub base_url: Option<String>,

    /// Vision model used to describe the image
    #[arg(long)]
    pub vision_model: Option<String>,

    /// Instruction sent alongside the image
    #[arg(long)]
    pub prompt: Option<String>,

    /// Upper bound on description length, in tokens
    #[arg(long)]
    pub max_tokens: Option<u32>,
}

impl ApiArgs {
    /// Apply flag overrides on top of the loaded config.
    pub fn apply(&self, config: &mut Config) {
        if let Some(ref base_url) = self.base_url {
            config.api.base_url = base_url.clone();
        }
        if let Some(ref model) = self.vision_model {
            config.vision.model = model.clone();
        }
        if let Some(ref prompt) = self.prompt {
            config.vision.prompt = prompt.clone();
        }
        if let Some(max_tokens) = self.max_tokens {
            config.vision.max_tokens = max_tokens;
        }
    }
}
