//! Ninjaview - an interactive terminal viewer for ninja builds
//!
//! Main entry point for the ninjaview CLI application.

use std::process::ExitCode;

use console::style;
use tracing_subscriber::EnvFilter;

use ninjaview::cli::{self, Cli, Commands};
use ninjaview::config::Config;
use ninjaview::error::Result;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Set up logging
    setup_logging(&cli);

    // Run the application
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Set up logging based on CLI arguments
///
/// Interactive commands own the terminal, so their logs go to a file in the
/// cache directory instead of stderr.
fn setup_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if cli.command.is_interactive() {
        if let Some(file) = open_log_file() {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Arc::new(file))
                .with_ansi(false)
                .init();
        }
        // No log file available: stay silent rather than corrupt the TUI
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .without_time()
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Open the log file used while the TUI is active
fn open_log_file() -> Option<std::fs::File> {
    let dir = dirs::cache_dir()?.join("ninjaview");
    std::fs::create_dir_all(&dir).ok()?;
    std::fs::File::options()
        .create(true)
        .append(true)
        .open(dir.join("ninjaview.log"))
        .ok()
}

/// Main application logic
fn run(cli: Cli) -> Result<()> {
    let config = Config::load_from(cli.config.as_deref())?;

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Watch(args) => cli::execute_watch(&args, &config),
        Commands::Replay(args) => cli::execute_replay(&args, &config),
        Commands::Stats(args) => cli::execute_stats(&args, cli.quiet),
        Commands::Config(args) => cli::execute_config(&args),
    }
}
