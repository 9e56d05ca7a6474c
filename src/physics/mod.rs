// src/physics/mod.rs
pub mod adsorbate;
pub mod oxidation;
pub mod pairs;
pub mod pdos;

pub use adsorbate::{insert_adsorbates, HeightReference, InsertionParams};
pub use pairs::{check_inversion_pairs, find_pairs, Pair};
pub use pdos::{integrate_block, integrate_window, IntegrationBounds, WindowIntegral};
