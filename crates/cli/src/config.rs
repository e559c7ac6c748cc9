//! Top-level CLI configuration.

use clap::Parser;

use crate::commands::Command;

/// Consistent hash ring toolbox.
#[derive(Debug, Parser)]
#[command(name = "hashring", version, about)]
pub struct CliConfig {
    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// Execute the selected subcommand.
    pub fn run(self) -> anyhow::Result<()> {
        self.command.run()
    }
}
