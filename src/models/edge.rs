//! Build edge representation

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// A single build edge (one ninja build statement)
///
/// An edge is created when ninja reports it starting and filled in when it
/// finishes. Timestamps are taken from the local clock at message receipt,
/// so durations are only meaningful for live builds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildEdge {
    /// Edge id assigned by ninja
    pub id: usize,
    /// Compiler or rule that produces the outputs
    pub compiler: String,
    /// Input files
    pub inputs: Vec<PathBuf>,
    /// Output files
    pub outputs: Vec<PathBuf>,
    /// Outcome, `None` while the edge is still running
    pub success: Option<bool>,
    /// Command line as reported by ninja, if finished
    pub command: Option<String>,
    /// Captured stdout/stderr of the command, if finished
    pub output: Option<String>,
    /// When the start message was received
    pub started_at: Option<DateTime<Utc>>,
    /// When the finish message was received
    pub finished_at: Option<DateTime<Utc>>,
}

impl BuildEdge {
    /// Create a freshly started edge
    pub fn started(
        id: usize,
        compiler: impl Into<String>,
        inputs: Vec<PathBuf>,
        outputs: Vec<PathBuf>,
    ) -> Self {
        Self {
            id,
            compiler: compiler.into(),
            inputs,
            outputs,
            success: None,
            command: None,
            output: None,
            started_at: Some(Utc::now()),
            finished_at: None,
        }
    }

    /// Whether the edge has finished (successfully or not)
    pub fn is_finished(&self) -> bool {
        self.success.is_some()
    }

    /// Whether the edge finished and failed
    pub fn is_failed(&self) -> bool {
        self.success == Some(false)
    }

    /// Wall-clock duration between start and finish messages
    pub fn duration(&self) -> Option<chrono::Duration> {
        match (self.started_at, self.finished_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }

    /// One-line summary: `compiler: inputs -> outputs` (file names only)
    pub fn summary(&self) -> String {
        format!(
            "{}: {} -> {}",
            self.compiler,
            join_file_names(&self.inputs),
            join_file_names(&self.outputs)
        )
    }
}

/// Join the file names of a path list with commas, skipping paths
/// without a final component
fn join_file_names(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy())
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge() -> BuildEdge {
        BuildEdge::started(
            7,
            "gcc",
            vec![PathBuf::from("src/a.c"), PathBuf::from("src/b.c")],
            vec![PathBuf::from("out/ab.o")],
        )
    }

    #[test]
    fn test_summary_uses_file_names() {
        assert_eq!(edge().summary(), "gcc: a.c, b.c -> ab.o");
    }

    #[test]
    fn test_lifecycle_flags() {
        let mut e = edge();
        assert!(!e.is_finished());
        assert!(!e.is_failed());
        assert!(e.duration().is_none());

        e.success = Some(false);
        e.finished_at = Some(Utc::now());
        assert!(e.is_finished());
        assert!(e.is_failed());
        assert!(e.duration().is_some());
    }

    #[test]
    fn test_summary_empty_inputs() {
        let e = BuildEdge::started(1, "phony", vec![], vec![PathBuf::from("all")]);
        assert_eq!(e.summary(), "phony:  -> all");
    }
}
