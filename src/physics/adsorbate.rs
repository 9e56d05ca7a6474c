// src/physics/adsorbate.rs

use super::pairs::Pair;
use crate::model::Structure;
use crate::utils::linalg;
use serde::{Deserialize, Serialize};

/// What the insertion heights are measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeightReference {
    /// High atom: z_high + d. Low atom: -z_high - d.
    Pair,
    /// Heights added to the z of the topmost atom of the input structure.
    TopLayer,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InsertionParams {
    pub species: String,
    /// Planar offset in fractions of the first two lattice vectors.
    pub offset: (f64, f64),
    /// Vacuum added along the surface normal before insertion (Angstrom).
    pub vacuum: f64,
    /// Distance between an anchor and its new atom (Angstrom).
    pub distance: f64,
    pub reference: HeightReference,
}

impl InsertionParams {
    pub fn new(species: &str, offset: (f64, f64)) -> Self {
        Self {
            species: species.to_string(),
            offset,
            vacuum: 2.0,
            distance: 2.0,
            reference: HeightReference::Pair,
        }
    }
}

/// Adds one `params.species` atom per member of every selected pair.
///
/// The input is left untouched; the returned copy has `params.vacuum` of
/// extra headroom. For a pair the higher atom's partner goes `distance`
/// above it and the lower atom's partner is mirrored to `-z_high - distance`,
/// which keeps the pair's inversion symmetry once the cell is wrapped.
/// Selected indices outside `pairs` are skipped; repeated indices insert
/// again.
pub fn insert_adsorbates(
    structure: &Structure,
    pairs: &[Pair],
    selected: &[usize],
    params: &InsertionParams,
) -> Structure {
    let mut modified = structure.clone();
    modified.add_vacuum(params.vacuum);

    let shift = linalg::planar_offset(params.offset, modified.lattice);
    let z_top = structure
        .top_atom_index()
        .map(|i| structure.atoms[i].position[2])
        .unwrap_or(0.0);

    for &pair_index in selected {
        let Some(&(i1, i2)) = pairs.get(pair_index) else {
            log::debug!("Pair {} out of range ({} pairs), skipped", pair_index, pairs.len());
            continue;
        };
        let (Some(a1), Some(a2)) = (structure.atoms.get(i1), structure.atoms.get(i2)) else {
            log::debug!("Pair {} references missing atoms ({}, {})", pair_index, i1, i2);
            continue;
        };

        // First atom wins ties
        let a1_high = a1.position[2] >= a2.position[2];
        let z_high = if a1_high { a1.position[2] } else { a2.position[2] };

        let (h_high, h_low) = match params.reference {
            HeightReference::Pair => (z_high + params.distance, -z_high - params.distance),
            HeightReference::TopLayer => (
                z_top + params.distance,
                z_top - z_high - params.distance,
            ),
        };
        let (z1, z2) = if a1_high { (h_high, h_low) } else { (h_low, h_high) };

        for (anchor, z) in [(a1, z1), (a2, z2)] {
            let pos = [anchor.position[0] + shift[0], anchor.position[1] + shift[1], z];
            modified.push_atom(&params.species, pos);
        }
    }

    modified
}
