// src/workflow/outcome.rs

use std::path::PathBuf;

/// Result of handling one item (atom file, pair directory) in a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome<T> {
    Processed(T),
    Skipped { item: String, reason: String },
}

impl<T> ItemOutcome<T> {
    pub fn skipped(item: impl Into<String>, reason: impl Into<String>) -> Self {
        ItemOutcome::Skipped {
            item: item.into(),
            reason: reason.into(),
        }
    }
}

/// Counts gathered over a whole batch run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct BatchSummary {
    /// Directories that produced their output.
    pub directories_done: usize,
    /// Items written across all directories (CSV rows or POSCAR files).
    pub items_written: usize,
    /// (item, reason) for every skipped item.
    pub skipped: Vec<(String, String)>,
    /// (directory, error) for every directory that failed.
    pub failed: Vec<(PathBuf, String)>,
}

impl BatchSummary {
    pub fn record_skip(&mut self, item: String, reason: String) {
        log::warn!("Skipped {}: {}", item, reason);
        self.skipped.push((item, reason));
    }

    pub fn record_failure(&mut self, dir: PathBuf, err: impl std::fmt::Display) {
        log::error!("Failed {}: {}", dir.display(), err);
        self.failed.push((dir, err.to_string()));
    }

    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}
