// src/utils/linalg.rs

use nalgebra::{Matrix3, Vector3};

/// Lattice vectors as the rows of a matrix.
pub fn lattice_matrix(lattice: [[f64; 3]; 3]) -> Matrix3<f64> {
  Matrix3::from_fn(|i, j| lattice[i][j])
}

/// Convert fractional coordinates to Cartesian using lattice matrix
///
/// # Formula
/// ```text
/// Cartesian = Lattice^T × Fractional
/// ```
pub fn frac_to_cart(frac: [f64; 3], lattice: [[f64; 3]; 3]) -> [f64; 3] {
  let cart_vec = lattice_matrix(lattice).transpose() * Vector3::from(frac);
  [cart_vec.x, cart_vec.y, cart_vec.z]
}

/// Convert Cartesian coordinates to fractional using lattice matrix
///
/// Returns `None` if the lattice is singular.
pub fn cart_to_frac(cart: [f64; 3], lattice: [[f64; 3]; 3]) -> Option<[f64; 3]> {
  let inv_lat = lattice_matrix(lattice).transpose().try_inverse()?;
  let frac_vec = inv_lat * Vector3::from(cart);
  Some([frac_vec.x, frac_vec.y, frac_vec.z])
}

/// In-plane Cartesian displacement for an offset given in fractions of the
/// first two lattice vectors. Only their x/y components are used.
pub fn planar_offset(offset: (f64, f64), lattice: [[f64; 3]; 3]) -> [f64; 2] {
  let (fa, fb) = offset;
  [
    fa * lattice[0][0] + fb * lattice[1][0],
    fa * lattice[0][1] + fb * lattice[1][1],
  ]
}
