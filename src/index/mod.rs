//! Binned gene index.

pub mod bins;
pub mod genes;

pub use bins::{bin_of, bin_of_range, BinKey, BinSet};
pub use genes::GeneIndex;
