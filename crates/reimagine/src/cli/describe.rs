//! The `reimagine describe` command: vision step only.

use clap::Args;
use reimagine_core::{Config, Pipeline};
use std::path::PathBuf;

use super::ApiArgs;

/// Arguments for the `describe` command.
#[derive(Args, Debug)]
pub struct DescribeArgs {
    /// Source image (JPEG, PNG, GIF or WebP)
    #[arg(required = true)]
    pub image: PathBuf,

    #[command(flatten)]
    pub api: ApiArgs,

    /// Also print the raw API response
    #[arg(long)]
    pub raw: bool,
}

/// Execute the describe command.
pub async fn execute(args: DescribeArgs, mut config: Config) -> anyhow::Result<()> {
    args.api.apply(&mut config);
    config.validate()?;

    let pipeline = Pipeline::try_from_config(&config, args.api.api_key.as_deref())?;
    let reply = pipeline.describe(&args.image).await?;

    println!("{}", reply.description);
    if args.raw {
        println!("{}", reply.raw_response);
    }

    tracing::debug!(
        "Description from {} in {}ms",
        reply.model.as_deref().unwrap_or(&config.vision.model),
        reply.latency_ms
    );
    Ok(())
}
