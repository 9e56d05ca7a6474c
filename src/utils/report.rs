// src/utils/report.rs

use crate::model::structure::Structure;
use crate::physics::Pair;
use crate::workflow::BatchSummary;

/// Short listing of a structure, printed by `list-pairs`.
pub fn structure_summary(structure: &Structure, filename: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("File: {}\n", filename));
    out.push_str(&format!("Formula: {} ({} atoms)\n", structure.formula(), structure.len()));
    for (name, v) in ["a", "b", "c"].iter().zip(&structure.lattice) {
        out.push_str(&format!("{} = [{:.4}, {:.4}, {:.4}]\n", name, v[0], v[1], v[2]));
    }
    if structure.uses_selective_dynamics() {
        out.push_str("Selective dynamics\n");
    }
    out.push_str("--------------------------------------------------\n");
    out.push_str(&format!(
        "{:<8} {:<8} {:<10} {:<10} {:<10}\n",
        "Index", "Element", "X", "Y", "Z"
    ));
    out.push_str("--------------------------------------------------\n");

    for (i, atom) in structure.atoms.iter().take(20).enumerate() {
        out.push_str(&format!(
            "{:<8} {:<8} {:<10.4} {:<10.4} {:<10.4}\n",
            i, atom.element, atom.position[0], atom.position[1], atom.position[2]
        ));
    }

    if structure.atoms.len() > 20 {
        out.push_str(&format!("... and {} more atoms.\n", structure.atoms.len() - 20));
    }

    out
}

/// Numbered pair table with the z of both members.
pub fn pair_listing(structure: &Structure, element: &str, pairs: &[Pair]) -> String {
    if pairs.is_empty() {
        return format!("No {} pairs found.\n", element);
    }

    let mut out = String::new();
    out.push_str(&format!("{} pairs of {}:\n", pairs.len(), element));
    out.push_str(&format!(
        "{:<6} {:<8} {:<8} {:<10} {:<10}\n",
        "Pair", "Atom 1", "Atom 2", "Z1", "Z2"
    ));

    for (n, &(i, j)) in pairs.iter().enumerate() {
        let z = |k: usize| structure.atoms.get(k).map_or(f64::NAN, |a| a.position[2]);
        out.push_str(&format!(
            "{:<6} {:<8} {:<8} {:<10.4} {:<10.4}\n",
            n,
            i,
            j,
            z(i),
            z(j)
        ));
    }
    out
}

/// One-paragraph account of a batch run.
pub fn batch_summary(summary: &BatchSummary) -> String {
    let mut out = format!(
        "Done: {} directories, {} items written, {} skipped, {} failed\n",
        summary.directories_done,
        summary.items_written,
        summary.skipped.len(),
        summary.failed.len()
    );
    for (dir, err) in &summary.failed {
        out.push_str(&format!("  failed {}: {}\n", dir.display(), err));
    }
    out
}
