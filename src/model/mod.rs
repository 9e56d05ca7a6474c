//src/model/mod.rs
pub mod elements;
pub mod result;
pub mod spectrum;
pub mod structure;

// Re-exports for cleaner imports
pub use elements::{Block, Element};
pub use result::AtomResult;
pub use spectrum::Spectrum;
pub use structure::{Atom, Structure};
