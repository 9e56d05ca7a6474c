// src/physics/oxidation.rs

use crate::error::Result;
use crate::model::{Block, Element};

/// Oxidation-state estimate from an integrated electron count.
///
/// This is a bookkeeping heuristic, not a formal-charge calculation: the
/// nominal outer-subshell valence is taken from the periodic table, two
/// electrons are added for the filled s subshell counted alongside p, d and
/// f valence shells, and the integrated count is subtracted.
pub fn oxidation_state(nominal_valence: u32, block: Block, e_tot: f64) -> f64 {
    let mut valence = nominal_valence;
    if block != Block::S {
        valence += 2;
    }
    valence as f64 - e_tot
}

/// Looks up the element's valence and applies [`oxidation_state`].
pub fn estimate(element: &Element, e_tot: f64) -> Result<f64> {
    Ok(oxidation_state(element.valence()?, element.block(), e_tot))
}
