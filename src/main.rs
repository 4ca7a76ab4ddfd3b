//! Perseus command-line video editor
//!
//! # Usage
//!
//! ```bash
//! perseus probe --input interview.mp4
//! perseus plan --clip interview.mp4@0:05-0:42 --clip broll.mov --output cut.mp4
//! perseus render --clip interview.mp4@5-42 --clip broll.mov@2- --output cut.mp4
//! perseus session
//! ```

use std::io::BufWriter;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use perseus::app::DefaultAppContainer;
use perseus::cli::session::Session;
use perseus::cli::{commands, Cli, Commands};
use perseus::config::ConfigLoader;
use perseus::utils::logging::init_logging;

/// Main entry point for the Perseus CLI
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = ConfigLoader::from_process_env()
        .load(cli.config.as_deref(), &cli.overrides())
        .context("Failed to load configuration")?;
    init_logging(&config.logging.level, config.logging.format)
        .context("Failed to initialise logging")?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Perseus");
    let container = DefaultAppContainer::new(config);

    match cli.command {
        Commands::Probe(args) => commands::probe(&container, args).await?,
        Commands::Plan(args) => commands::plan(&container, args).await?,
        Commands::Render(args) => commands::render(&container, args).await?,
        Commands::Session => {
            let stdin = tokio::io::BufReader::new(tokio::io::stdin());
            let mut stdout = BufWriter::new(std::io::stdout());
            Session::new(&container).run(stdin, &mut stdout).await?;
        }
    }

    Ok(())
}
