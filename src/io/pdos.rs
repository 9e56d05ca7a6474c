// src/io/pdos.rs

use crate::error::{Result, WorkflowError};
use crate::model::Spectrum;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Most quantities a per-atom table carries: energy plus s, p, d, f pairs.
const MAX_QUANTITIES: usize = 9;

/// On-disk orientation of a per-atom PDOS table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpectrumLayout {
    /// One line per energy point: `E s_up s_dn p_up p_dn ...`
    Columns,
    /// One line per quantity (energy first), as written by `np.savetxt`
    /// of a stacked array.
    Rows,
    /// `Rows` when the table has at most nine lines, each longer than the
    /// line count, and the first line is a non-decreasing energy axis;
    /// `Columns` otherwise.
    Auto,
}

impl SpectrumLayout {
    /// Resolves `Auto` against a parsed table.
    pub fn detect(self, table: &[Vec<f64>]) -> SpectrumLayout {
        match self {
            SpectrumLayout::Auto => {
                let n = table.len();
                let transposed = n <= MAX_QUANTITIES
                    && table.iter().all(|line| line.len() > n)
                    && table
                        .first()
                        .map_or(false, |e| e.windows(2).all(|w| w[0] <= w[1]));
                if transposed {
                    SpectrumLayout::Rows
                } else {
                    SpectrumLayout::Columns
                }
            }
            fixed => fixed,
        }
    }
}

/// Atom identity encoded in a `<element><index>_total.dat` filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomLabel {
    pub element: String,
    /// Digits exactly as written in the filename (e.g. "01").
    pub index: String,
}

impl AtomLabel {
    /// Key that orders indices numerically at any length: digit count
    /// without leading zeros, then the digits. `None` when there is no index.
    pub fn sort_key(&self) -> Option<(usize, String)> {
        if self.index.is_empty() {
            return None;
        }
        let digits = self.index.trim_start_matches('0');
        Some((digits.len(), digits.to_string()))
    }
}

/// Splits `Fe12_total.dat` into element `Fe` and index `12`.
///
/// The label is the text before the first `_`. Every digit in it forms the
/// index; the element is the label with leading and trailing digits removed.
pub fn parse_atom_label(filename: &str) -> AtomLabel {
    let label = filename.split('_').next().unwrap_or(filename);
    let index: String = label.chars().filter(|c| c.is_ascii_digit()).collect();
    let element = label.trim_matches(|c: char| c.is_ascii_digit()).to_string();
    AtomLabel { element, index }
}

pub fn load(path: &Path, layout: SpectrumLayout) -> Result<Spectrum> {
    let text = fs::read_to_string(path)?;
    let spectrum = parse_str(&text, layout).map_err(|e| match e {
        WorkflowError::MalformedSpectrum(msg) => WorkflowError::parse(path, msg),
        other => other,
    })?;
    log::debug!("{}: {} energy points", path.display(), spectrum.n_rows());
    Ok(spectrum)
}

/// Parses a whitespace-delimited table with a single header line.
pub fn parse_str(text: &str, layout: SpectrumLayout) -> Result<Spectrum> {
    let mut table: Vec<Vec<f64>> = Vec::new();

    for (lineno, line) in text.lines().enumerate().skip(1) {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let row = trimmed
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>().map_err(|_| {
                    WorkflowError::MalformedSpectrum(format!(
                        "line {}: invalid number '{}'",
                        lineno + 1,
                        tok
                    ))
                })
            })
            .collect::<Result<Vec<f64>>>()?;
        table.push(row);
    }

    if table.is_empty() {
        return Err(WorkflowError::MalformedSpectrum("no data rows".to_string()));
    }

    match layout.detect(&table) {
        SpectrumLayout::Rows => Spectrum::from_columns(table),
        _ => Spectrum::from_rows(&table),
    }
}
