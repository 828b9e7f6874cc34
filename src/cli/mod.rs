//! Command-line interface for ninjaview

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Ninjaview - an interactive viewer for ninja builds
///
/// Watch a live ninja build, replay a captured structured log, or
/// summarize one from the command line.
#[derive(Parser, Debug)]
#[command(name = "ninjaview")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "NINJAVIEW_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run ninja and watch the build live
    Watch(WatchArgs),

    /// Replay a captured structured log file
    Replay(ReplayArgs),

    /// Summarize a captured structured log file
    Stats(StatsArgs),

    /// Manage configuration
    Config(ConfigArgs),
}

impl Commands {
    /// Whether this command takes over the terminal with the TUI
    pub fn is_interactive(&self) -> bool {
        matches!(self, Self::Watch(_) | Self::Replay(_))
    }
}

/// Arguments for the watch command
#[derive(Parser, Debug, Clone)]
pub struct WatchArgs {
    /// Ninja binary to run (default: `ninja` on PATH)
    #[arg(long)]
    pub ninja_binary: Option<PathBuf>,

    /// Directory to run the build in
    #[arg(short = 'C', long)]
    pub build_dir: Option<PathBuf>,

    /// Additional arguments passed through to ninja
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub ninja_args: Vec<String>,
}

/// Arguments for the replay command
#[derive(Parser, Debug)]
pub struct ReplayArgs {
    /// Structured log file to replay
    #[arg(required = true)]
    pub log_file: PathBuf,
}

/// Arguments for the stats command
#[derive(Parser, Debug)]
pub struct StatsArgs {
    /// Structured log file to summarize
    #[arg(required = true)]
    pub log_file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Pretty)]
    pub format: ReportFormat,

    /// Maximum entries in the slowest-edges list
    #[arg(short, long, default_value = "10")]
    pub limit: usize,
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable pretty output
    Pretty,
    /// JSON output
    Json,
    /// TOML output
    Toml,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Configuration subcommand
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Edit configuration file
    Edit,
    /// Reset configuration to defaults
    Reset,
    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
