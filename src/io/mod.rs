// src/io/mod.rs
pub mod csv;
pub mod pdos;
pub mod poscar;
