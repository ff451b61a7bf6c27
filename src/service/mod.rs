//! Imagery service interface
//!
//! Every pixel-level step of the workflow goes through `ImageryService`.
//! `LocalImageryService` implements it over an in-memory `Catalog`.

pub mod catalog;
pub mod local;

pub use catalog::Catalog;
pub use local::LocalImageryService;

use crate::coordinate::Geometry;
use crate::raster::errors::RasterResult;
use crate::raster::{DateRange, ImageCollection, RasterImage};
use crate::reduce::{Histogram, Reducer, ReductionResult};
use crate::visualization::HistogramOptions;

/// Per-image function mapped over a collection
pub type ImageFn<'a> = dyn Fn(&RasterImage) -> RasterResult<RasterImage> + 'a;

/// Collection retrieval, compositing, band math and reductions
pub trait ImageryService {
    /// Scenes of an archive intersecting `spatial_filter` and acquired in `date_range`
    fn get_collection(
        &self,
        archive_id: &str,
        spatial_filter: &Geometry,
        date_range: &DateRange,
    ) -> RasterResult<ImageCollection>;

    /// Apply a function to every image of a collection
    fn map_over_collection(
        &self,
        collection: &ImageCollection,
        per_image_fn: &ImageFn<'_>,
    ) -> RasterResult<ImageCollection>;

    /// Per-pixel median of a collection
    fn median(&self, collection: &ImageCollection) -> RasterResult<RasterImage>;

    /// `(band_a - band_b) / (band_a + band_b)` as a single band named `nd`
    fn normalized_difference(&self, image: &RasterImage, band_a: &str, band_b: &str) -> RasterResult<RasterImage>;

    /// One statistic per band over a region
    fn reduce_region(
        &self,
        image: &RasterImage,
        reducer: Reducer,
        geometry: &Geometry,
        scale: f64,
        max_pixels: u64,
    ) -> RasterResult<ReductionResult>;

    /// Area of a geometry in square meters
    fn area(&self, geometry: &Geometry) -> f64;

    /// Binned distribution of band values over a region
    fn histogram(
        &self,
        image: &RasterImage,
        geometry: &Geometry,
        scale: f64,
        max_pixels: u64,
        options: &HistogramOptions,
    ) -> RasterResult<Histogram>;
}
