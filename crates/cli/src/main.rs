//! CLI entry point for hashring-rs.

use clap::Parser;
use hashring_cli::CliConfig;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .init();

    let config = CliConfig::parse();
    config.run()
}
