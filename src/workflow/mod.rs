// src/workflow/mod.rs
pub mod add_pairs;
pub mod integrate_pdos;
pub mod outcome;
pub mod scan;

pub use add_pairs::PairInsertionParams;
pub use outcome::{BatchSummary, ItemOutcome};
pub use scan::Category;
