//! Command execution handlers

use console::style;

use crate::analyzer::LogAnalyzer;
use crate::config::Config;
use crate::error::Result;
use crate::parsers::structlog;
use crate::runner::{self, NinjaOptions};
use crate::state::BuildState;
use crate::tui::{run_tui, App};

/// Execute the watch command
pub fn execute_watch(args: &super::WatchArgs, config: &Config) -> Result<()> {
    let options = NinjaOptions {
        binary: args
            .ninja_binary
            .clone()
            .or_else(|| config.general.ninja_binary.clone()),
        build_dir: args
            .build_dir
            .clone()
            .or_else(|| config.general.build_dir.clone()),
        args: args.ninja_args.clone(),
    };

    let source = runner::spawn_ninja(options)?;
    let app = App::new(config);
    run_tui(app, source.receiver())
}

/// Execute the replay command
pub fn execute_replay(args: &super::ReplayArgs, config: &Config) -> Result<()> {
    let source = runner::open_log_file(&args.log_file)?;
    let app = App::new(config);
    run_tui(app, source.receiver())
}

/// Execute the stats command
pub fn execute_stats(args: &super::StatsArgs, quiet: bool) -> Result<()> {
    use indicatif::{ProgressBar, ProgressStyle};

    let spinner = if quiet || args.format != super::ReportFormat::Pretty {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Reading {}...", args.log_file.display()));
        pb
    };

    let messages = structlog::read_log_file(&args.log_file)?;
    let mut state = BuildState::new();
    for message in messages {
        state.apply(message);
    }
    spinner.finish_and_clear();

    let report = LogAnalyzer::new(&state).analyze(args.limit);

    match args.format {
        super::ReportFormat::Pretty => {
            println!("{}", style("Build Report").bold().underlined());
            println!();

            // Summary
            println!("{}", style("Summary").bold());
            let outcome = match report.build_succeeded {
                Some(true) => style("succeeded").green().to_string(),
                Some(false) => style("failed").red().to_string(),
                None => style("incomplete log").yellow().to_string(),
            };
            println!("  Outcome:   {}", outcome);
            println!("  Planned:   {} edges", report.total_edges);
            println!("  Started:   {}", report.started);
            println!(
                "  Finished:  {} ({} ok, {} failed)",
                report.finished, report.succeeded, report.failed
            );
            println!();

            // Per-compiler breakdown
            if !report.compilers.is_empty() {
                println!("{}", style("By compiler").bold());
                for c in &report.compilers {
                    if c.failed > 0 {
                        println!(
                            "  {:<20} {:>5}  ({} failed)",
                            c.compiler,
                            c.count,
                            style(c.failed).red()
                        );
                    } else {
                        println!("  {:<20} {:>5}", c.compiler, c.count);
                    }
                }
                println!();
            }

            // Slowest edges
            if !report.slowest.is_empty() {
                println!("{}", style("Slowest edges").bold());
                for edge in &report.slowest {
                    println!("  {:>7} ms  {}", edge.duration_ms, edge.summary);
                }
                println!();
            }

            // Failures
            if !report.failures.is_empty() {
                println!("{}", style("Failures").red().bold());
                for failure in &report.failures {
                    println!("  • {}", failure.summary);
                    if let Some(ref command) = failure.command {
                        println!("    $ {}", style(command).dim());
                    }
                    if let Some(ref output) = failure.output {
                        for line in output.lines().take(10) {
                            println!("    {}", line);
                        }
                    }
                }
            }
        }
        super::ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        super::ReportFormat::Toml => {
            println!(
                "{}",
                toml::to_string_pretty(&report)
                    .map_err(|e| crate::error::NinjaviewError::Other(e.to_string()))?
            );
        }
    }

    Ok(())
}

/// Execute the config command
pub fn execute_config(args: &super::ConfigArgs) -> Result<()> {
    match &args.command {
        super::ConfigCommands::Show => {
            let config = Config::load()?;
            println!(
                "{}",
                toml::to_string_pretty(&config)
                    .map_err(|e| crate::error::NinjaviewError::Other(e.to_string()))?
            );
        }
        super::ConfigCommands::Edit => {
            let config_path = Config::config_path()?;
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());
            std::process::Command::new(editor)
                .arg(&config_path)
                .status()?;
        }
        super::ConfigCommands::Reset => {
            Config::reset()?;
            println!("Configuration reset to defaults");
        }
        super::ConfigCommands::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(key, value)?;
            config.save()?;
            println!("Set {} = {}", key, value);
        }
        super::ConfigCommands::Get { key } => {
            let config = Config::load()?;
            if let Some(value) = config.get(key) {
                println!("{}", value);
            } else {
                println!("Key '{}' not found", key);
            }
        }
        super::ConfigCommands::Init { force } => {
            Config::init(*force)?;
            println!("Configuration initialized");
        }
    }

    Ok(())
}
