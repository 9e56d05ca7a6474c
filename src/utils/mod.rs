// src/utils/mod.rs
pub mod linalg;
pub mod logger;
pub mod quadrature;
pub mod report;
