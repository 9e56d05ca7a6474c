// src/physics/pairs.rs

use crate::model::Structure;
use crate::utils::linalg;

/// Indices of two same-species atoms that are inversion partners.
pub type Pair = (usize, usize);

/// Pairs up atoms of `element` in file order: (0,1), (2,3), ...
///
/// Precondition: the structure lists inversion partners consecutively.
/// Nothing here verifies it; see [`check_inversion_pairs`]. An odd number
/// of matching atoms yields no pairs.
pub fn find_pairs(structure: &Structure, element: &str) -> Vec<Pair> {
    let indices: Vec<usize> = structure
        .atoms
        .iter()
        .enumerate()
        .filter(|(_, a)| a.element == element)
        .map(|(i, _)| i)
        .collect();

    if indices.len() % 2 != 0 {
        return Vec::new();
    }

    indices.chunks_exact(2).map(|c| (c[0], c[1])).collect()
}

/// Returns the positions (into `pairs`) of pairs that do not share an
/// inversion centre with the first pair.
///
/// Inversion centres of a lattice repeat every half lattice vector, so two
/// pairs are consistent when their fractional midpoints differ by a
/// multiple of 1/2 along each axis, within `tol`.
pub fn check_inversion_pairs(structure: &Structure, pairs: &[Pair], tol: f64) -> Vec<usize> {
    let midpoint = |&(i, j): &Pair| -> Option<[f64; 3]> {
        let a = linalg::cart_to_frac(structure.atoms.get(i)?.position, structure.lattice)?;
        let b = linalg::cart_to_frac(structure.atoms.get(j)?.position, structure.lattice)?;
        Some([(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0, (a[2] + b[2]) / 2.0])
    };

    let reference = match pairs.first().and_then(midpoint) {
        Some(m) => m,
        None => return (0..pairs.len()).collect(),
    };

    pairs
        .iter()
        .enumerate()
        .filter(|(_, p)| match midpoint(*p) {
            Some(m) => (0..3).any(|k| {
                let twice = 2.0 * (m[k] - reference[k]);
                (twice - twice.round()).abs() > tol
            }),
            None => true,
        })
        .map(|(n, _)| n)
        .collect()
}
