mod input;
mod platforms;
mod report;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::input::CopyArgs;

#[derive(Debug, Parser)]
#[command(name = "copylab")]
#[command(about = "Ad-copy optimization pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Analyze, rewrite and validate a piece of ad copy
    Optimize {
        #[command(flatten)]
        copy: CopyArgs,

        /// Writer passes to run (clamped to 1-4)
        #[arg(long, default_value_t = 1)]
        iterations: u32,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Score a piece of ad copy without rewriting it
    Score {
        #[command(flatten)]
        copy: CopyArgs,

        /// Print the assessment as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the effective platform profiles
    Platforms {
        /// YAML file overriding or extending the built-in profiles
        #[arg(long, env = "COPYLAB_PLATFORMS_PATH")]
        file: Option<PathBuf>,

        /// Print the profiles as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Optimize {
            copy,
            iterations,
            json,
        } => {
            let config = copylab_core::load_app_config_from_env()?;
            init_tracing(&config.log_level)?;
            run::optimize(&config, copy, iterations, json).await
        }
        Commands::Score { copy, json } => {
            let config = copylab_core::load_app_config_from_env()?;
            init_tracing(&config.log_level)?;
            run::score(&config, copy, json).await
        }
        Commands::Platforms { file, json } => {
            init_tracing("info")?;
            platforms::list(file.as_deref(), json)
        }
    }
}

/// Install the fmt subscriber. `RUST_LOG` wins over `log_level`.
fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
