// src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by both pipelines.
#[derive(Error, Debug)]
pub enum WorkflowError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error in {path:?}: {msg}")]
    Parse { path: PathBuf, msg: String },

    /// No energy row lies inside [lower, upper].
    #[error("Empty integration window [{lower}, {upper}]")]
    EmptyWindow { lower: f64, upper: f64 },

    #[error("Spectrum has {available} columns, column {requested} requested")]
    MissingColumn { requested: usize, available: usize },

    #[error("Malformed spectrum: {0}")]
    MalformedSpectrum(String),

    #[error("Element lookup failed for '{symbol}': {reason}")]
    Lookup { symbol: String, reason: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("No qualifying directories found under {0:?}")]
    NoDirectories(PathBuf),
}

impl WorkflowError {
    pub fn parse(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        WorkflowError::Parse {
            path: path.into(),
            msg: msg.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, WorkflowError>;
