//! Raster data model
//!
//! This module provides the in-memory image, band and collection types
//! that every processing step consumes and produces.

pub mod errors;
pub mod band;
pub mod image;
pub mod collection;
#[cfg(test)]
pub(crate) mod tests;

pub use errors::{RasterError, RasterResult};
pub use band::Band;
pub use image::{GeoTransform, RasterImage};
pub use collection::{DateRange, ImageCollection, parse_date};
