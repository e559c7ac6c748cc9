//! CLI tool for working with consistent hash rings.
//!
//! Provides commands for:
//! - Looking up the owner of a key
//! - Distributing a batch of keys across nodes
//! - Walking through an add/remove rebalancing scenario
//! - Reporting ring balance statistics

pub mod commands;
pub mod config;

pub use commands::Command;
pub use config::CliConfig;
