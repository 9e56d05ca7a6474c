// src/model/spectrum.rs

use super::elements::Block;
use crate::error::{Result, WorkflowError};

/// Energy-resolved projected DOS for one atom.
///
/// Column 0 is the energy axis; each orbital shell contributes an
/// (up, down) pair: s = (1, 2), p = (3, 4), d = (5, 6), f = (7, 8).
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    columns: Vec<Vec<f64>>,
}

impl Spectrum {
    /// Builds a spectrum from column vectors. All columns must share a length.
    pub fn from_columns(columns: Vec<Vec<f64>>) -> Result<Self> {
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        if let Some((i, c)) = columns.iter().enumerate().find(|(_, c)| c.len() != rows) {
            return Err(WorkflowError::MalformedSpectrum(format!(
                "spectrum column {} has {} rows, expected {}",
                i,
                c.len(),
                rows
            )));
        }
        Ok(Self { columns })
    }

    /// Builds a spectrum from row-major records (one energy point per row).
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let width = rows.first().map(|r| r.len()).unwrap_or(0);
        let mut columns = vec![Vec::with_capacity(rows.len()); width];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(WorkflowError::MalformedSpectrum(format!(
                    "spectrum row {} has {} values, expected {}",
                    i,
                    row.len(),
                    width
                )));
            }
            for (col, &v) in columns.iter_mut().zip(row.iter()) {
                col.push(v);
            }
        }
        Ok(Self { columns })
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn energy(&self) -> Result<&[f64]> {
        self.column(0)
    }

    pub fn column(&self, idx: usize) -> Result<&[f64]> {
        self.columns
            .get(idx)
            .map(|c| c.as_slice())
            .ok_or(WorkflowError::MissingColumn {
                requested: idx,
                available: self.columns.len(),
            })
    }
}

/// Column indices of the (up, down) densities for an orbital block.
pub fn spin_columns(block: Block) -> (usize, usize) {
    let up = 1 + 2 * block.l() as usize;
    (up, up + 1)
}
