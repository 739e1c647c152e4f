//! Command-line interface for icebound.

use clap::{Parser, Subcommand};
use icebound::Difficulty;

/// Icebound - ice-slide puzzle session engine
#[derive(Parser, Debug)]
#[command(name = "icebound")]
#[command(about = "Ice-slide puzzle engine driven by an external level provider", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a session, reading intents from stdin
    Play {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Level provider base URL (overrides config)
        #[arg(long)]
        provider_url: Option<String>,

        /// Starting difficulty: easy, medium, hard, extreme (overrides config)
        #[arg(short, long)]
        difficulty: Option<Difficulty>,
    },
}
