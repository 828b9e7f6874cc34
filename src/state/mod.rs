//! Incremental build state
//!
//! [`BuildState`] folds the stream of structlog messages into the picture the
//! UI renders: which edges exist, which are done, and how the build is going
//! overall.

use std::collections::HashMap;

use chrono::Utc;

use crate::models::{BuildEdge, BuildStatus};
use crate::parsers::structlog::StructLogMessage;

/// Aggregated state of a ninja build
#[derive(Debug, Default)]
pub struct BuildState {
    /// All edges seen so far, in arrival order
    edges: Vec<BuildEdge>,
    /// Edge id -> index into `edges`
    index: HashMap<usize, usize>,
    /// Indices of finished edges, in finish order
    finished: Vec<usize>,
    /// Total edge count announced by ninja, 0 until known
    total_edges: usize,
    /// Number of finished edges that failed
    failed: usize,
    /// Whether ninja reported the build finished, and with what outcome
    build_result: Option<bool>,
}

impl BuildState {
    /// Create an empty state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one structlog message
    pub fn apply(&mut self, message: StructLogMessage) {
        match message {
            StructLogMessage::BuildStarted { total_edges } => {
                self.total_edges = total_edges;
            }
            StructLogMessage::BuildEdgeStarted {
                edge_id,
                compiler,
                inputs,
                outputs,
            } => {
                if let Some(&i) = self.index.get(&edge_id) {
                    // Restarted edge id: undo its finish bookkeeping so the
                    // failed count and finished list track actual outcomes
                    if self.edges[i].is_failed() {
                        self.failed -= 1;
                    }
                    if self.edges[i].is_finished() {
                        self.finished.retain(|&f| f != i);
                    }
                    self.edges[i] = BuildEdge::started(edge_id, compiler, inputs, outputs);
                } else {
                    self.index.insert(edge_id, self.edges.len());
                    self.edges
                        .push(BuildEdge::started(edge_id, compiler, inputs, outputs));
                }
            }
            StructLogMessage::BuildEdgeFinished {
                edge_id,
                success,
                command,
                output,
            } => {
                let i = match self.index.get(&edge_id) {
                    Some(&i) => i,
                    None => {
                        // Finish without a start, record what we know
                        tracing::debug!(edge_id, "finish message for unseen edge");
                        let i = self.edges.len();
                        self.index.insert(edge_id, i);
                        self.edges.push(BuildEdge::started(edge_id, "?", vec![], vec![]));
                        self.edges[i].started_at = None;
                        i
                    }
                };

                let edge = &mut self.edges[i];
                if edge.is_finished() {
                    // Duplicate finish, ignore
                    return;
                }
                edge.success = Some(success);
                edge.command = Some(command);
                edge.output = Some(output);
                edge.finished_at = Some(Utc::now());

                self.finished.push(i);
                if !success {
                    self.failed += 1;
                }
            }
            StructLogMessage::BuildFinished { success } => {
                self.build_result = Some(success);
            }
        }
    }

    /// Overall build status
    pub fn status(&self) -> BuildStatus {
        match self.build_result {
            Some(true) => BuildStatus::Succeeded,
            Some(false) => BuildStatus::Failed,
            None if self.edges.is_empty() && self.total_edges == 0 => BuildStatus::Pending,
            None => BuildStatus::Running,
        }
    }

    /// All edges seen so far, in arrival order
    pub fn edges(&self) -> &[BuildEdge] {
        &self.edges
    }

    /// Finished edges in the order they completed
    pub fn finished_edges(&self) -> impl Iterator<Item = &BuildEdge> {
        self.finished.iter().map(|&i| &self.edges[i])
    }

    /// Look up an edge by ninja's edge id
    pub fn edge(&self, edge_id: usize) -> Option<&BuildEdge> {
        self.index.get(&edge_id).map(|&i| &self.edges[i])
    }

    /// Total edge count announced by ninja (0 until `build_started` arrives)
    pub fn total_edges(&self) -> usize {
        self.total_edges
    }

    /// Number of edges that have started
    pub fn started_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of edges that have finished
    pub fn finished_count(&self) -> usize {
        self.finished.len()
    }

    /// Number of finished edges that failed
    pub fn failed_count(&self) -> usize {
        self.failed
    }

    /// Number of edges currently running
    pub fn running_count(&self) -> usize {
        self.edges.len() - self.finished.len()
    }

    /// Fraction of edges finished, clamped to 0..=1, 0 while the total
    /// is unknown
    pub fn progress(&self) -> f64 {
        if self.total_edges == 0 {
            0.0
        } else {
            (self.finished.len() as f64 / self.total_edges as f64).min(1.0)
        }
    }
}
