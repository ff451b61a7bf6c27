//! The compositing workflow
//!
//! Fixed sequence: fetch and mask the collection, composite it, composite
//! the unmasked collection for comparison, compute the index, reduce it
//! over the region, measure the region and bin a histogram. Every step
//! feeds the next; the first failure aborts the run.

use log::info;

use crate::coordinate::{square_meters_to_square_kilometers, Geometry};
use crate::raster::errors::RasterResult;
use crate::raster::RasterImage;
use crate::reduce::{Histogram, ReductionResult};
use crate::service::ImageryService;
use crate::visualization::{Layer, MapSink, OutputSink};
use crate::workflow::config::WorkflowConfig;

/// Label printed in front of the region area
pub const AREA_LABEL: &str = "Polygon area: ";

/// Everything the workflow produced
#[derive(Debug, Clone)]
pub struct WorkflowReport {
    /// Number of scenes matching the collection filters
    pub scene_count: usize,
    pub masked_composite: RasterImage,
    pub unmasked_composite: RasterImage,
    pub index: RasterImage,
    pub region: Geometry,
    pub region_statistics: ReductionResult,
    pub area_km2: f64,
    pub histogram: Histogram,
}

/// Runs the workflow against an imagery service
pub struct Workflow<'a, S: ImageryService + ?Sized> {
    service: &'a S,
    config: &'a WorkflowConfig,
}

impl<'a, S: ImageryService + ?Sized> Workflow<'a, S> {
    pub fn new(service: &'a S, config: &'a WorkflowConfig) -> Self {
        Workflow { service, config }
    }

    /// Run every step and emit layers and printed results to the sinks
    pub fn run(&self, map: &mut dyn MapSink, output: &mut dyn OutputSink) -> RasterResult<WorkflowReport> {
        let config = self.config;
        let service = self.service;
        let filter = config.filter_point();
        let dates = config.date_range()?;
        let quality_mask = config.quality_mask()?;

        // 1-2: fetch the collection and mask every scene
        let collection = service.get_collection(&config.collection.archive, &filter, &dates)?;
        let masked = service.map_over_collection(&collection, &|image: &RasterImage| quality_mask.apply(image))?;
        info!("Masked {} scenes with '{}'", masked.len(), quality_mask.encoding().name);

        // 3: median of the masked collection
        let masked_composite = service.median(&masked)?;
        map.set_center(config.map.center[0], config.map.center[1], config.map.zoom);
        map.add_layer(Layer::Image { image: &masked_composite, vis: &config.composite_vis }, &config.layers.masked)?;

        // 4: the same collection without masking, for comparison
        let unmasked = service.get_collection(&config.collection.archive, &filter, &dates)?;
        let unmasked_composite = service.median(&unmasked)?;
        map.add_layer(Layer::Image { image: &unmasked_composite, vis: &config.composite_vis }, &config.layers.unmasked)?;
        map.add_layer(Layer::Image { image: &masked_composite, vis: &config.median_vis }, &config.layers.median)?;

        // 5: vegetation index
        let index = service
            .normalized_difference(&masked_composite, &config.index.band_a, &config.index.band_b)?
            .rename(&[config.index.name.as_str()])?;
        map.add_layer(Layer::Image { image: &index, vis: &config.index.vis }, &config.layers.index)?;

        // 6: region of interest
        let region = config.region.geometry()?;
        map.add_layer(Layer::Geometry { geometry: &region, vis: &config.region.vis }, &config.layers.region)?;
        map.center_object(&region);

        // 7: statistic over the region
        let region_statistics = service.reduce_region(
            &index,
            config.reducer()?,
            &region,
            config.reduction.scale,
            config.reduction.max_pixels,
        )?;
        output.print(None, &region_statistics);

        // 8: region area
        let area_km2 = square_meters_to_square_kilometers(service.area(&region));
        output.print(Some(AREA_LABEL), &area_km2);

        // 9: histogram
        let histogram = service.histogram(
            &index,
            &region,
            config.reduction.scale,
            config.reduction.max_pixels,
            &config.histogram,
        )?;
        output.print(None, &histogram);

        info!("Workflow finished: {} scenes, {} = {}, area {:.4} km2",
              collection.len(), config.index.name, region_statistics, area_km2);

        Ok(WorkflowReport {
            scene_count: collection.len(),
            masked_composite,
            unmasked_composite,
            index,
            region,
            region_statistics,
            area_km2,
            histogram,
        })
    }
}
