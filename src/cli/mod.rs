//! Command-line interface for the gateway binary.

mod list;
mod run;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_FILE;

pub use list::{
    fetch_events, list_channels, list_events, list_skills, print_channels, print_events,
    print_skills,
};
pub use run::{build_state, run_gateway, serve, shutdown_signal};

/// Command-line options for the gateway.
#[derive(Debug, Parser)]
#[command(name = "gateway", version, about = "Webhook ingestion gateway")]
pub struct Cli {
    /// Path to the YAML config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start the gateway HTTP server
    Run,
    /// Print configured channels
    ListChannels,
    /// Print registered skills
    ListSkills,
    /// Print recent events from a running gateway
    ListEvents {
        /// Maximum number of events to display
        #[arg(long, default_value_t = 20, allow_negative_numbers = true)]
        limit: i64,
        /// Number of newest events to skip
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset: i64,
        /// Gateway base URL; defaults to the configured server address
        #[arg(long)]
        url: Option<String>,
    },
}

/// Dispatch a parsed command line.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let mut stdout = std::io::stdout();
    match cli.command {
        Command::Run => run_gateway(&cli.config).await,
        Command::ListChannels => list_channels(&cli.config, &mut stdout),
        Command::ListSkills => list_skills(&cli.config, &mut stdout),
        Command::ListEvents { limit, offset, url } => {
            list_events(&cli.config, url, limit, offset, &mut stdout).await
        }
    }
}
