// src/model/result.rs

use super::elements::Block;

/// Integrated PDOS summary for one atom file.
#[derive(Clone, Debug, PartialEq)]
pub struct AtomResult {
    pub element: String,
    /// Index digits as they appear in the filename.
    pub index: String,
    /// Orders rows numerically: (significant digit count, digits).
    pub sort_key: (usize, String),
    pub e_tot: f64,
    pub oxidation_state: f64,
    pub spin: f64,
    pub block: Block,
}

/// Sorts rows by numeric atom index; equal indices keep their input order.
pub fn sort_by_index(rows: &mut [AtomResult]) {
    rows.sort_by(|a, b| a.sort_key.cmp(&b.sort_key));
}
