//! Error types for ninjaview

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for ninjaview operations
#[derive(Error, Debug)]
pub enum NinjaviewError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse structlog message: {0}")]
    LogParsing(String),

    #[error("Invalid structlog message at line {line}: {source}")]
    LogParsingAt {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to launch ninja: {0}")]
    NinjaLaunch(String),

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for ninjaview operations
pub type Result<T> = std::result::Result<T, NinjaviewError>;

impl NinjaviewError {
    /// Create a new log parsing error
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::LogParsing(msg.into())
    }

    /// Create a new ninja launch error
    pub fn launch(msg: impl Into<String>) -> Self {
        Self::NinjaLaunch(msg.into())
    }

    /// Create a file not found error
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }
}
