//! reimagine CLI - describe an image with a vision model, then render a new
//! image from that description.
//!
//! # Usage
//!
//! ```bash
//! # Full pipeline: describe, generate, download
//! reimagine run pikachu_0.png
//!
//! # Widescreen, natural style, into ./renders
//! reimagine run pikachu_0.png --size landscape --style natural --output-dir renders
//!
//! # Description only
//! reimagine describe pikachu_0.png
//!
//! # View configuration
//! reimagine config show
//! ```

use clap::{Parser, Subcommand};
use logging::LogSettings;
use reimagine_core::config::LoggingConfig;
use reimagine_core::Config;
use std::path::PathBuf;
use std::process::ExitCode;

mod cli;
mod logging;

/// reimagine - turn an image into a description, and the description into a new image.
#[derive(Parser, Debug)]
#[command(name = "reimagine")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Describe an image, generate a new one from the description, and save it
    Run(cli::run::RunArgs),

    /// Describe an image and print the description
    Describe(cli::describe::DescribeArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before clap reads OPENAI_API_KEY from the environment.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();

    // `config` must work even when the config file is broken, since it is
    // how the file gets inspected and repaired.
    let result = match cli.command {
        Commands::Config(args) => {
            init_logging(&LoggingConfig::default(), cli.verbose, cli.json_logs, &dotenv);
            cli::config::execute(args).await
        }
        Commands::Run(args) => {
            let Some(config) = load_config() else {
                return ExitCode::FAILURE;
            };
            init_logging(&config.logging, cli.verbose, cli.json_logs, &dotenv);
            cli::run::execute(args, config).await
        }
        Commands::Describe(args) => {
            let Some(config) = load_config() else {
                return ExitCode::FAILURE;
            };
            init_logging(&config.logging, cli.verbose, cli.json_logs, &dotenv);
            cli::describe::execute(args, config).await
        }
    };

    // Single exit-code boundary: every failure surfaces here as exit 1.
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logging isn't initialized yet, so config errors go straight to stderr.
fn load_config() -> Option<Config> {
    match Config::load() {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!(
                "Error: Failed to load config: {e}\n  \
                 Fix it or regenerate it with `reimagine config init --force`."
            );
            None
        }
    }
}

fn init_logging(
    config: &LoggingConfig,
    verbose: bool,
    json_logs: bool,
    dotenv: &Result<PathBuf, dotenvy::Error>,
) {
    logging::init(&LogSettings::resolve(config, verbose, json_logs));

    tracing::debug!("reimagine v{}", reimagine_core::VERSION);
    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) => tracing::debug!("No .env file loaded: {e}"),
    }
}
