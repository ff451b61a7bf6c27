//! Image compositing

pub mod median;

pub use median::{median, median_of, MEDIAN_IMAGE_ID};
