//! Webhook Gateway - Binary Entry Point

use clap::Parser;

use webhook_gateway::cli::{execute, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    execute(Cli::parse()).await
}
