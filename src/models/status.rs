//! Overall build status

use std::fmt;

use serde::{Deserialize, Serialize};

/// State of the build as a whole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BuildStatus {
    /// No log messages received yet
    Pending,
    /// At least one edge has started and the build has not finished
    Running,
    /// Build finished with all edges succeeding
    Succeeded,
    /// Build finished with at least one failing edge
    Failed,
}

impl BuildStatus {
    /// Whether the build has reached a terminal state
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::Running => "building",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        write!(f, "{}", s)
    }
}
