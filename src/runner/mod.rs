//! Log sources: a live ninja process or a captured log file
//!
//! Both sources are drained by a reader thread that parses structlog lines
//! and forwards them over a channel. The channel disconnecting means the
//! source is exhausted (ninja exited or the file ended).

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;

use crate::error::{NinjaviewError, Result};
use crate::parsers::structlog::{self, StructLogMessage};

/// Options for spawning ninja
#[derive(Debug, Clone, Default)]
pub struct NinjaOptions {
    /// Ninja binary to run (default: `ninja` on PATH)
    pub binary: Option<PathBuf>,
    /// Directory to run the build in (default: current directory)
    pub build_dir: Option<PathBuf>,
    /// Extra arguments passed through to ninja
    pub args: Vec<String>,
}

/// A running source of structlog messages
#[derive(Debug)]
pub struct LogSource {
    receiver: mpsc::Receiver<StructLogMessage>,
    /// Child handle when the source is a live ninja process
    child: Option<Child>,
}

impl LogSource {
    /// Receiver for the message stream
    pub fn receiver(&self) -> &mpsc::Receiver<StructLogMessage> {
        &self.receiver
    }
}

impl Drop for LogSource {
    fn drop(&mut self) {
        // Kill is a no-op error for a child that already exited; the wait
        // reaps it either way so no zombie is left behind.
        if let Some(child) = self.child.as_mut() {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

/// Spawn ninja with structured logging enabled and tail its output
pub fn spawn_ninja(options: NinjaOptions) -> Result<LogSource> {
    let binary = options.binary.unwrap_or_else(|| PathBuf::from("ninja"));
    check_availability(&binary)?;

    let build_dir = options.build_dir.unwrap_or_else(|| PathBuf::from("."));
    tracing::debug!(binary = %binary.display(), build_dir = %build_dir.display(), "spawning ninja");

    let mut child = Command::new(&binary)
        .current_dir(&build_dir)
        .arg("-d")
        .arg("structlog")
        .args(&options.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .spawn()
        .map_err(|e| NinjaviewError::launch(format!("{}: {}", binary.display(), e)))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| NinjaviewError::launch("could not capture ninja stdout"))?;

    Ok(LogSource {
        receiver: spawn_reader(stdout),
        child: Some(child),
    })
}

/// Tail a previously captured structlog file
pub fn open_log_file(path: &Path) -> Result<LogSource> {
    if !path.exists() {
        return Err(NinjaviewError::file_not_found(path));
    }
    let file = std::fs::File::open(path)?;

    Ok(LogSource {
        receiver: spawn_reader(file),
        child: None,
    })
}

/// Check that the ninja binary exists and answers `--version`
fn check_availability(binary: &Path) -> Result<()> {
    let output = Command::new(binary)
        .arg("--version")
        .output()
        .map_err(|_| NinjaviewError::launch(format!("{} not found", binary.display())))?;

    if !output.status.success() {
        return Err(NinjaviewError::launch(format!(
            "{} --version failed",
            binary.display()
        )));
    }
    Ok(())
}

/// Parse structlog lines from a reader on a background thread
///
/// Malformed lines are logged and skipped rather than tearing down the
/// stream; a flaky line should not kill a running build view.
pub fn spawn_reader<R: Read + Send + 'static>(reader: R) -> mpsc::Receiver<StructLogMessage> {
    let (tx, rx) = mpsc::channel::<StructLogMessage>();

    thread::spawn(move || {
        for line in BufReader::new(reader).lines() {
            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    tracing::warn!("log stream read error: {}", e);
                    break;
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            match structlog::parse_line(&line) {
                Ok(message) => {
                    if tx.send(message).is_err() {
                        // Receiver gone, stop reading
                        break;
                    }
                }
                Err(e) => tracing::warn!("skipping malformed structlog line: {}", e),
            }
        }
    });

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_spawn_reader_streams_messages() {
        let input = concat!(
            r#"{"type":"build_started","total_edges":2}"#,
            "\n",
            r#"{"type":"build_edge_finished","edge_id":1,"success":true,"command":"cc","output":""}"#,
            "\n",
            r#"{"type":"build_finished","success":true}"#,
            "\n",
        );

        let rx = spawn_reader(Cursor::new(input.to_string()));
        let messages: Vec<StructLogMessage> = rx.iter().collect();
        assert_eq!(messages.len(), 3);
        match &messages[0] {
            StructLogMessage::BuildStarted { total_edges } => assert_eq!(*total_edges, 2),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_spawn_reader_skips_malformed_lines() {
        let input = concat!(
            "garbage\n",
            r#"{"type":"build_finished","success":false}"#,
            "\n",
        );

        let rx = spawn_reader(Cursor::new(input.to_string()));
        let messages: Vec<StructLogMessage> = rx.iter().collect();
        assert_eq!(messages.len(), 1);
    }

    #[test]
    fn test_open_log_file_missing() {
        let err = open_log_file(Path::new("/nonexistent/build.structlog")).unwrap_err();
        assert!(matches!(err, NinjaviewError::FileNotFound { .. }));
    }

    #[test]
    fn test_spawn_ninja_missing_binary() {
        let options = NinjaOptions {
            binary: Some(PathBuf::from("/nonexistent/ninja")),
            ..NinjaOptions::default()
        };
        let err = spawn_ninja(options).unwrap_err();
        assert!(matches!(err, NinjaviewError::NinjaLaunch(_)));
    }
}
