//! Workflow configuration
//!
//! Every constant of the compositing workflow lives here. `Default`
//! reproduces the reference run (Landsat 8 SR over the Colorado Front
//! Range, summer 2016); a TOML file may override any field.

use std::fs;
use std::path::Path;

use log::info;
use serde::Deserialize;

use crate::coordinate::{Geometry, Point};
use crate::qa::{self, QualityMask, DEFAULT_ENCODING};
use crate::raster::errors::{RasterError, RasterResult};
use crate::raster::DateRange;
use crate::reduce::Reducer;
use crate::visualization::{Color, GeometryVis, HistogramOptions, VisParams};

/// Complete workflow configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub collection: CollectionConfig,
    pub map: MapConfig,
    pub layers: LayerNames,
    /// Display of the masked and unmasked composites
    pub composite_vis: VisParams,
    /// Display of the `median` layer
    pub median_vis: VisParams,
    pub index: IndexConfig,
    pub region: RegionConfig,
    pub reduction: ReductionConfig,
    pub histogram: HistogramOptions,
}

/// Which scenes to fetch and how to mask them
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CollectionConfig {
    pub archive: String,
    /// Spatial filter as `[lon, lat]`
    pub point: [f64; 2],
    pub start: String,
    /// Exclusive end date
    pub end: String,
    pub qa_encoding: String,
}

impl Default for CollectionConfig {
    fn default() -> Self {
        CollectionConfig {
            archive: "LANDSAT/LC08/C01/T1_SR".to_string(),
            point: [-105.66, 39.97],
            start: "2016-06-1".to_string(),
            end: "2016-09-15".to_string(),
            qa_encoding: DEFAULT_ENCODING.to_string(),
        }
    }
}

/// Initial map view
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// `[lon, lat]`
    pub center: [f64; 2],
    pub zoom: u8,
}

impl Default for MapConfig {
    fn default() -> Self {
        MapConfig {
            center: [114.0079, -26.0765],
            zoom: 9,
        }
    }
}

/// Names of the registered map layers
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayerNames {
    pub masked: String,
    pub unmasked: String,
    pub median: String,
    pub index: String,
    pub region: String,
}

impl Default for LayerNames {
    fn default() -> Self {
        LayerNames {
            masked: "SRmasked".to_string(),
            unmasked: "SR_unmasked".to_string(),
            median: "median".to_string(),
            index: "NDVI SR_product".to_string(),
            region: "poly1".to_string(),
        }
    }
}

/// Normalized difference index settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub band_a: String,
    pub band_b: String,
    /// Name given to the index band
    pub name: String,
    pub vis: VisParams,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            band_a: "B5".to_string(),
            band_b: "B4".to_string(),
            name: "NDVI".to_string(),
            vis: VisParams::palette(-1.0, 1.0, vec![
                Color::new(0, 0, 255),
                Color::new(255, 255, 255),
                Color::new(0, 128, 0),
            ]),
        }
    }
}

/// Region of interest: a buffered point, or a polygon when given
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RegionConfig {
    /// `[lon, lat]` of the buffered point
    pub point: [f64; 2],
    pub buffer_m: f64,
    /// Polygon ring as `[lon, lat]` pairs; replaces the buffered point
    pub polygon: Option<Vec<[f64; 2]>>,
    pub vis: GeometryVis,
}

impl Default for RegionConfig {
    fn default() -> Self {
        RegionConfig {
            point: [-105.6185272, 40.0693832],
            buffer_m: 700.0,
            polygon: None,
            vis: GeometryVis::default(),
        }
    }
}

impl RegionConfig {
    /// Build the region geometry
    pub fn geometry(&self) -> RasterResult<Geometry> {
        match &self.polygon {
            Some(ring) => Geometry::polygon(ring.iter().copied().map(Point::from_lon_lat).collect()),
            None => {
                if !(self.buffer_m > 0.0) {
                    return Err(RasterError::InvalidGeometry(format!(
                        "buffer must be positive, got {} m", self.buffer_m
                    )));
                }
                Ok(Point::from_lon_lat(self.point).buffer(self.buffer_m))
            }
        }
    }
}

/// Region reduction settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReductionConfig {
    pub reducer: String,
    /// Sampling resolution in meters
    pub scale: f64,
    pub max_pixels: u64,
}

impl Default for ReductionConfig {
    fn default() -> Self {
        ReductionConfig {
            reducer: "mean".to_string(),
            scale: 30.0,
            max_pixels: 1_000_000_000,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        WorkflowConfig {
            collection: CollectionConfig::default(),
            map: MapConfig::default(),
            layers: LayerNames::default(),
            composite_vis: VisParams::rgb(["B4", "B3", "B2"], 0.0, 3000.0).with_gamma(1.4),
            median_vis: VisParams::rgb(["B4", "B3", "B2"], 0.0, 0.3),
            index: IndexConfig::default(),
            region: RegionConfig::default(),
            reduction: ReductionConfig::default(),
            histogram: HistogramOptions::default(),
        }
    }
}

impl WorkflowConfig {
    /// Parse a TOML configuration; missing fields keep the reference values
    pub fn from_toml(content: &str) -> RasterResult<Self> {
        let config: WorkflowConfig = toml::from_str(content)
            .map_err(|e| RasterError::ConfigError(format!("Failed to parse workflow config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> RasterResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = WorkflowConfig::from_toml(&content)?;
        info!("Loaded workflow config from {}", path.display());
        Ok(config)
    }

    /// Check that every derived value can be built
    pub fn validate(&self) -> RasterResult<()> {
        self.date_range()?;
        self.quality_mask()?;
        self.reducer()?;
        self.region.geometry()?;
        if !(self.reduction.scale > 0.0) {
            return Err(RasterError::ConfigError(format!(
                "reduction scale must be positive, got {}", self.reduction.scale
            )));
        }
        Ok(())
    }

    pub fn date_range(&self) -> RasterResult<DateRange> {
        DateRange::parse(&self.collection.start, &self.collection.end)
    }

    pub fn quality_mask(&self) -> RasterResult<QualityMask> {
        Ok(QualityMask::new(qa::get_encoding(&self.collection.qa_encoding)?))
    }

    pub fn reducer(&self) -> RasterResult<Reducer> {
        self.reduction.reducer.parse()
    }

    /// Spatial filter of the collection request
    pub fn filter_point(&self) -> Geometry {
        Geometry::Point(Point::from_lon_lat(self.collection.point))
    }
}
