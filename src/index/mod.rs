//! Spectral band indices

pub mod normalized_difference;

pub use normalized_difference::{ndvi, normalized_difference, normalized_difference_value, NORMALIZED_DIFFERENCE_BAND};
