//! Imagery service computing everything in memory

use log::info;

use crate::compositing;
use crate::coordinate::Geometry;
use crate::index;
use crate::raster::errors::RasterResult;
use crate::raster::{DateRange, ImageCollection, RasterImage};
use crate::reduce::{self, Histogram, Reducer, ReductionResult};
use crate::service::{Catalog, ImageFn, ImageryService};
use crate::utils::progress::ProgressTracker;
use crate::visualization::HistogramOptions;

/// `ImageryService` over an in-memory catalog
pub struct LocalImageryService {
    catalog: Catalog,
    show_progress: bool,
}

impl LocalImageryService {
    pub fn new(catalog: Catalog) -> Self {
        LocalImageryService {
            catalog,
            show_progress: false,
        }
    }

    /// Show a progress bar while mapping over collections
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }
}

impl ImageryService for LocalImageryService {
    fn get_collection(
        &self,
        archive_id: &str,
        spatial_filter: &Geometry,
        date_range: &DateRange,
    ) -> RasterResult<ImageCollection> {
        let collection = self.catalog.archive(archive_id)?
            .filter_bounds(spatial_filter)
            .filter_date(date_range);

        info!("Collection '{}' filtered to {} and {}: {} scenes",
              archive_id, spatial_filter, date_range, collection.len());
        Ok(collection)
    }

    fn map_over_collection(
        &self,
        collection: &ImageCollection,
        per_image_fn: &ImageFn<'_>,
    ) -> RasterResult<ImageCollection> {
        if !self.show_progress {
            return collection.map(per_image_fn);
        }

        let progress = ProgressTracker::new(collection.len() as u64, "Mapping over collection");
        let mapped = collection.map(|image| {
            progress.set_message(image.id());
            let result = per_image_fn(image);
            progress.increment(1);
            result
        });
        progress.finish();
        mapped
    }

    fn median(&self, collection: &ImageCollection) -> RasterResult<RasterImage> {
        compositing::median(collection)
    }

    fn normalized_difference(&self, image: &RasterImage, band_a: &str, band_b: &str) -> RasterResult<RasterImage> {
        index::normalized_difference(image, band_a, band_b)
    }

    fn reduce_region(
        &self,
        image: &RasterImage,
        reducer: Reducer,
        geometry: &Geometry,
        scale: f64,
        max_pixels: u64,
    ) -> RasterResult<ReductionResult> {
        reduce::reduce_region(image, reducer, geometry, scale, max_pixels)
    }

    fn area(&self, geometry: &Geometry) -> f64 {
        geometry.area()
    }

    fn histogram(
        &self,
        image: &RasterImage,
        geometry: &Geometry,
        scale: f64,
        max_pixels: u64,
        options: &HistogramOptions,
    ) -> RasterResult<Histogram> {
        reduce::histogram(image, geometry, scale, max_pixels, options)
    }
}
