// src/model/structure.rs

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Atom {
    pub element: String,
    /// Cartesian position in Angstrom.
    pub position: [f64; 3],
    /// Selective-dynamics flags, present only when the source file used them.
    #[serde(default)]
    pub selective: Option<[bool; 3]>,
}

impl Atom {
    pub fn new(element: &str, position: [f64; 3]) -> Self {
        Self {
            element: element.to_string(),
            position,
            selective: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    // Comment line of the POSCAR header
    pub comment: String,
    // Lattice vectors: [a_vec, b_vec, c_vec]
    pub lattice: [[f64; 3]; 3],
    pub atoms: Vec<Atom>,
}

impl Structure {
    pub fn new(lattice: [[f64; 3]; 3], atoms: Vec<Atom>) -> Self {
        Self {
            comment: String::new(),
            lattice,
            atoms,
        }
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn uses_selective_dynamics(&self) -> bool {
        self.atoms.iter().any(|a| a.selective.is_some())
    }

    /// Appends an atom; in a selective-dynamics structure it is left free to relax.
    pub fn push_atom(&mut self, element: &str, position: [f64; 3]) {
        let selective = if self.uses_selective_dynamics() {
            Some([true; 3])
        } else {
            None
        };
        self.atoms.push(Atom {
            element: element.to_string(),
            position,
            selective,
        });
    }

    /// Index of the atom with the largest z (first one on ties).
    pub fn top_atom_index(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, atom) in self.atoms.iter().enumerate() {
            match best {
                Some((_, z)) if atom.position[2] <= z => {}
                _ => best = Some((i, atom.position[2])),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Stretches the third lattice vector so the slab gains `vacuum` Angstrom
    /// along the surface normal. Atom positions are unchanged.
    pub fn add_vacuum(&mut self, vacuum: f64) {
        let a = Vector3::from(self.lattice[0]);
        let b = Vector3::from(self.lattice[1]);
        let c = Vector3::from(self.lattice[2]);

        let normal = a.cross(&b);
        let length = c.norm();
        let denom = normal.norm() * length;
        if denom < 1e-12 {
            return;
        }
        let cos_theta = normal.dot(&c) / denom;
        let new_length = length + vacuum / cos_theta;
        let c_new = c * (new_length / length);

        self.lattice[2] = [c_new.x, c_new.y, c_new.z];
    }

    /// Chemical formula in order of first appearance, e.g. "Cu2Fe2O4".
    pub fn formula(&self) -> String {
        let mut order: Vec<(String, usize)> = Vec::new();
        for atom in &self.atoms {
            match order.iter_mut().find(|(el, _)| *el == atom.element) {
                Some((_, n)) => *n += 1,
                None => order.push((atom.element.clone(), 1)),
            }
        }
        order
            .into_iter()
            .map(|(el, n)| if n == 1 { el } else { format!("{}{}", el, n) })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic(a: f64) -> [[f64; 3]; 3] {
        [[a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a]]
    }

    #[test]
    fn test_add_vacuum_orthogonal() {
        let mut s = Structure::new(cubic(5.0), vec![Atom::new("O", [1.0, 1.0, 1.0])]);
        s.add_vacuum(2.0);
        assert!((s.lattice[2][2] - 7.0).abs() < 1e-12);
        assert_eq!(s.atoms[0].position, [1.0, 1.0, 1.0]);
        assert_eq!(s.lattice[0], [5.0, 0.0, 0.0]);
    }

    #[test]
    fn test_add_vacuum_tilted_c() {
        // c tilted 45 degrees: height grows by exactly the vacuum amount
        let mut s = Structure::new([[4.0, 0.0, 0.0], [0.0, 4.0, 0.0], [3.0, 0.0, 3.0]], vec![]);
        s.add_vacuum(2.0);
        assert!((s.lattice[2][2] - 5.0).abs() < 1e-10);
        assert!((s.lattice[2][0] - 5.0).abs() < 1e-10);
    }

    #[test]
    fn test_top_atom_and_formula() {
        let s = Structure::new(
            cubic(5.0),
            vec![
                Atom::new("Cu", [0.0, 0.0, 1.0]),
                Atom::new("Cu", [0.0, 0.0, 3.0]),
                Atom::new("O", [0.0, 0.0, 3.0]),
            ],
        );
        assert_eq!(s.top_atom_index(), Some(1));
        assert_eq!(s.formula(), "Cu2O");
    }

    #[test]
    fn test_push_atom_keeps_selective_flags() {
        let mut s = Structure::new(cubic(5.0), vec![Atom::new("Cu", [0.0; 3])]);
        s.atoms[0].selective = Some([false, false, true]);
        s.push_atom("H", [0.0, 0.0, 2.0]);
        assert_eq!(s.atoms[1].selective, Some([true; 3]));
    }
}
