//! Ninjaview - an interactive terminal viewer for ninja builds
//!
//! Ninjaview runs `ninja -d structlog` (or replays a captured log file) and
//! renders the build in a terminal UI: progress, finished edges, command
//! output, and per-edge dependencies. It can also summarize a log without
//! entering the UI.
//!
//! # Quick Start
//!
//! ```bash
//! # Run ninja in ./build and watch the build live
//! ninjaview watch -C build
//!
//! # Replay a captured structured log
//! ninjaview replay build.structlog
//!
//! # Summarize a log from the command line
//! ninjaview stats build.structlog --format json
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parsers;
pub mod runner;
pub mod state;
pub mod tui;

// Re-export commonly used types
pub use error::{NinjaviewError, Result};
pub use models::{BuildEdge, BuildStatus};
pub use state::BuildState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Summarize a captured structlog file
///
/// # Arguments
///
/// * `log_file` - Path to the captured structured log
/// * `limit` - Maximum entries in the slowest-edges list
///
/// # Returns
///
/// The build report on success
pub fn stats(log_file: &std::path::Path, limit: usize) -> Result<analyzer::BuildReport> {
    let messages = parsers::structlog::read_log_file(log_file)?;

    let mut state = BuildState::new();
    for message in messages {
        state.apply(message);
    }

    Ok(analyzer::LogAnalyzer::new(&state).analyze(limit))
}
