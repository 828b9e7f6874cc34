//! Parser for ninja's structured log stream
//!
//! When ninja runs with `-d structlog` it emits one JSON object per line on
//! stdout describing build progress. This module deserializes those lines
//! into [`StructLogMessage`] values.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{NinjaviewError, Result};

/// A single message from ninja's structured log
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum StructLogMessage {
    /// Emitted once when ninja has computed the set of edges to run
    #[serde(rename = "build_started")]
    BuildStarted {
        /// Number of edges ninja plans to execute
        total_edges: usize,
    },

    /// An edge's command has been spawned
    #[serde(rename = "build_edge_started")]
    BuildEdgeStarted {
        edge_id: usize,
        compiler: String,
        inputs: Vec<PathBuf>,
        outputs: Vec<PathBuf>,
    },

    /// An edge's command has exited
    #[serde(rename = "build_edge_finished")]
    BuildEdgeFinished {
        edge_id: usize,
        success: bool,
        command: String,
        output: String,
    },

    /// The build is over
    #[serde(rename = "build_finished")]
    BuildFinished { success: bool },
}

/// Parse a single structlog line
pub fn parse_line(line: &str) -> Result<StructLogMessage> {
    serde_json::from_str(line)
        .map_err(|e| NinjaviewError::parse(format!("{}: {:?}", e, line)))
}

/// Read a complete structlog capture from a file
///
/// Blank lines are skipped. A malformed line aborts the read and reports
/// its 1-based line number.
pub fn read_log_file(path: &Path) -> Result<Vec<StructLogMessage>> {
    if !path.exists() {
        return Err(NinjaviewError::file_not_found(path));
    }
    let file = std::fs::File::open(path)?;
    read_log(file)
}

/// Read a complete structlog capture from any reader
pub fn read_log<R: Read>(reader: R) -> Result<Vec<StructLogMessage>> {
    let mut messages = Vec::new();

    for (index, line) in BufReader::new(reader).lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let message = serde_json::from_str(&line)
            .map_err(|source| NinjaviewError::LogParsingAt {
                line: index + 1,
                source,
            })?;
        messages.push(message);
    }

    Ok(messages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_started() {
        let msg = parse_line(r#"{"type":"build_started","total_edges":42}"#).unwrap();
        match msg {
            StructLogMessage::BuildStarted { total_edges } => assert_eq!(total_edges, 42),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_parse_edge_started() {
        let msg = parse_line(
            r#"{"type":"build_edge_started","edge_id":3,"compiler":"g++","inputs":["src/main.cc"],"outputs":["obj/main.o"]}"#,
        )
        .unwrap();
        match msg {
            StructLogMessage::BuildEdgeStarted {
                edge_id,
                compiler,
                inputs,
                outputs,
            } => {
                assert_eq!(edge_id, 3);
                assert_eq!(compiler, "g++");
                assert_eq!(inputs, vec![PathBuf::from("src/main.cc")]);
                assert_eq!(outputs, vec![PathBuf::from("obj/main.o")]);
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_parse_edge_finished() {
        let msg = parse_line(
            r#"{"type":"build_edge_finished","edge_id":3,"success":false,"command":"g++ -c src/main.cc","output":"main.cc:1: error"}"#,
        )
        .unwrap();
        match msg {
            StructLogMessage::BuildEdgeFinished {
                edge_id,
                success,
                command,
                output,
            } => {
                assert_eq!(edge_id, 3);
                assert!(!success);
                assert_eq!(command, "g++ -c src/main.cc");
                assert_eq!(output, "main.cc:1: error");
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[test]
    fn test_parse_unknown_type() {
        assert!(parse_line(r#"{"type":"telemetry","payload":1}"#).is_err());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_line("not json at all").is_err());
    }

    #[test]
    fn test_read_log_skips_blank_lines() {
        let input = concat!(
            r#"{"type":"build_started","total_edges":1}"#,
            "\n\n",
            r#"{"type":"build_finished","success":true}"#,
            "\n",
        );
        let messages = read_log(input.as_bytes()).unwrap();
        assert_eq!(messages.len(), 2);
    }

    #[test]
    fn test_read_log_reports_line_number() {
        let input = concat!(
            r#"{"type":"build_started","total_edges":1}"#,
            "\n",
            "garbage\n",
        );
        let err = read_log(input.as_bytes()).unwrap_err();
        match err {
            NinjaviewError::LogParsingAt { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
