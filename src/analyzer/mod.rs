//! Build log analysis
//!
//! Turns a finished [`BuildState`] into a serializable report for the
//! `stats` command: totals, failures, per-compiler aggregation, and the
//! slowest edges.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::state::BuildState;

/// Number of slowest edges reported by default
pub const DEFAULT_LIMIT: usize = 10;

/// Analysis report for a build log
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct BuildReport {
    /// Total edge count announced by ninja
    pub total_edges: usize,
    /// Edges that started
    pub started: usize,
    /// Edges that finished
    pub finished: usize,
    /// Edges that finished successfully
    pub succeeded: usize,
    /// Edges that failed
    pub failed: usize,
    /// Final build outcome as reported by ninja, if the log contains one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_succeeded: Option<bool>,
    /// Details of every failing edge
    pub failures: Vec<FailedEdge>,
    /// Per-compiler aggregation, sorted by edge count descending
    pub compilers: Vec<CompilerStats>,
    /// Slowest edges by measured duration, longest first
    pub slowest: Vec<SlowEdge>,
}

/// A failing edge and what it printed
#[derive(Debug, Serialize, Deserialize)]
pub struct FailedEdge {
    /// Edge id assigned by ninja
    pub edge_id: usize,
    /// One-line edge summary
    pub summary: String,
    /// Command line that failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Captured stdout/stderr
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

/// Edge counts for one compiler/rule
#[derive(Debug, Serialize, Deserialize)]
pub struct CompilerStats {
    /// Compiler or rule name
    pub compiler: String,
    /// Finished edges for this compiler
    pub count: usize,
    /// How many of them failed
    pub failed: usize,
}

/// An edge with a measured duration
#[derive(Debug, Serialize, Deserialize)]
pub struct SlowEdge {
    /// Edge id assigned by ninja
    pub edge_id: usize,
    /// One-line edge summary
    pub summary: String,
    /// Wall-clock duration in milliseconds
    pub duration_ms: i64,
}

/// Analyzer over a folded build state
pub struct LogAnalyzer<'a> {
    state: &'a BuildState,
}

impl<'a> LogAnalyzer<'a> {
    /// Create a new analyzer
    pub fn new(state: &'a BuildState) -> Self {
        Self { state }
    }

    /// Produce a report, keeping at most `limit` entries in the
    /// slowest-edges list
    pub fn analyze(&self, limit: usize) -> BuildReport {
        let mut report = BuildReport {
            total_edges: self.state.total_edges(),
            started: self.state.started_count(),
            finished: self.state.finished_count(),
            failed: self.state.failed_count(),
            ..BuildReport::default()
        };
        report.succeeded = report.finished - report.failed;
        report.build_succeeded = match self.state.status() {
            crate::models::BuildStatus::Succeeded => Some(true),
            crate::models::BuildStatus::Failed => Some(false),
            _ => None,
        };

        let mut by_compiler: HashMap<&str, (usize, usize)> = HashMap::new();
        let mut timed: Vec<SlowEdge> = Vec::new();

        for edge in self.state.finished_edges() {
            let entry = by_compiler.entry(edge.compiler.as_str()).or_default();
            entry.0 += 1;
            if edge.is_failed() {
                entry.1 += 1;
                report.failures.push(FailedEdge {
                    edge_id: edge.id,
                    summary: edge.summary(),
                    command: edge.command.clone(),
                    output: edge.output.clone(),
                });
            }
            if let Some(duration) = edge.duration() {
                timed.push(SlowEdge {
                    edge_id: edge.id,
                    summary: edge.summary(),
                    duration_ms: duration.num_milliseconds(),
                });
            }
        }

        report.compilers = by_compiler
            .into_iter()
            .map(|(compiler, (count, failed))| CompilerStats {
                compiler: compiler.to_string(),
                count,
                failed,
            })
            .collect();
        // Stable ordering for output: by count, then name
        report.compilers
            .sort_by(|a, b| b.count.cmp(&a.count).then(a.compiler.cmp(&b.compiler)));

        timed.sort_by(|a, b| b.duration_ms.cmp(&a.duration_ms));
        timed.truncate(limit);
        report.slowest = timed;

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::structlog::StructLogMessage;
    use std::path::PathBuf;

    fn state_with(messages: Vec<StructLogMessage>) -> BuildState {
        let mut state = BuildState::new();
        for message in messages {
            state.apply(message);
        }
        state
    }

    fn started(edge_id: usize, compiler: &str) -> StructLogMessage {
        StructLogMessage::BuildEdgeStarted {
            edge_id,
            compiler: compiler.to_string(),
            inputs: vec![PathBuf::from("in.c")],
            outputs: vec![PathBuf::from("out.o")],
        }
    }

    fn finished(edge_id: usize, success: bool) -> StructLogMessage {
        StructLogMessage::BuildEdgeFinished {
            edge_id,
            success,
            command: "cc -c in.c".to_string(),
            output: if success {
                String::new()
            } else {
                "in.c:1: error".to_string()
            },
        }
    }

    #[test]
    fn test_counts() {
        let state = state_with(vec![
            StructLogMessage::BuildStarted { total_edges: 3 },
            started(1, "cc"),
            started(2, "cc"),
            started(3, "link"),
            finished(1, true),
            finished(2, false),
            StructLogMessage::BuildFinished { success: false },
        ]);

        let report = LogAnalyzer::new(&state).analyze(DEFAULT_LIMIT);
        assert_eq!(report.total_edges, 3);
        assert_eq!(report.started, 3);
        assert_eq!(report.finished, 2);
        assert_eq!(report.succeeded, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.build_succeeded, Some(false));
    }

    #[test]
    fn test_failures_include_output() {
        let state = state_with(vec![started(1, "cc"), finished(1, false)]);
        let report = LogAnalyzer::new(&state).analyze(DEFAULT_LIMIT);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].edge_id, 1);
        assert_eq!(report.failures[0].output.as_deref(), Some("in.c:1: error"));
    }

    #[test]
    fn test_compiler_aggregation_sorted() {
        let state = state_with(vec![
            started(1, "cc"),
            started(2, "cc"),
            started(3, "link"),
            finished(1, true),
            finished(2, false),
            finished(3, true),
        ]);
        let report = LogAnalyzer::new(&state).analyze(DEFAULT_LIMIT);

        assert_eq!(report.compilers.len(), 2);
        assert_eq!(report.compilers[0].compiler, "cc");
        assert_eq!(report.compilers[0].count, 2);
        assert_eq!(report.compilers[0].failed, 1);
        assert_eq!(report.compilers[1].compiler, "link");
    }

    #[test]
    fn test_slowest_limit() {
        let state = state_with(vec![
            started(1, "cc"),
            started(2, "cc"),
            started(3, "cc"),
            finished(1, true),
            finished(2, true),
            finished(3, true),
        ]);
        let report = LogAnalyzer::new(&state).analyze(2);
        assert!(report.slowest.len() <= 2);
    }

    #[test]
    fn test_report_serializes() {
        let state = state_with(vec![started(1, "cc"), finished(1, true)]);
        let report = LogAnalyzer::new(&state).analyze(DEFAULT_LIMIT);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"finished\":1"));
    }
}
