//! Command-line configuration.

use crate::commands::Command;
use anyhow::Context;
use clap::Parser;
use nodeconf::{load_registry, JsonSource};
use std::path::PathBuf;

/// Inspect a physical node configuration.
#[derive(Debug, Parser)]
#[command(name = "pnodectl", version, about)]
pub struct CliConfig {
    /// Node configuration document (JSON)
    #[arg(short, long)]
    pub config: PathBuf,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    pub fn run(self) -> anyhow::Result<()> {
        tracing_subscriber::fmt()
            .with_max_level(self.log_level())
            .with_writer(std::io::stderr)
            .init();

        let source = JsonSource::from_path(&self.config);
        let registry = load_registry(&source)
            .with_context(|| format!("loading {}", self.config.display()))?;

        let result = self.command.execute(&registry)?;
        print!("{}", result.output);
        if !result.found {
            std::process::exit(1);
        }
        Ok(())
    }
}
