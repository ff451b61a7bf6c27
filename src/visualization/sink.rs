//! Map and console sinks
//!
//! Layers are registered and described here; nothing is drawn.

use std::fmt;
use log::info;

use crate::coordinate::{Geometry, Point};
use crate::raster::errors::RasterResult;
use crate::raster::RasterImage;
use crate::visualization::vis_params::{GeometryVis, VisParams};

/// Zoom level used when centering on a zero-extent geometry
const POINT_ZOOM: u8 = 16;
const MAX_ZOOM: u8 = 24;

/// Something that can be added to the map
#[derive(Debug, Clone, Copy)]
pub enum Layer<'a> {
    Image { image: &'a RasterImage, vis: &'a VisParams },
    Geometry { geometry: &'a Geometry, vis: &'a GeometryVis },
}

/// Destination for map layers and view changes
pub trait MapSink {
    /// Add a named layer on top of the existing ones
    fn add_layer(&mut self, layer: Layer<'_>, name: &str) -> RasterResult<()>;

    /// Center the view on a location
    fn set_center(&mut self, lon: f64, lat: f64, zoom: u8);

    /// Center and zoom the view to fit a geometry
    fn center_object(&mut self, geometry: &Geometry) {
        let center = geometry.centroid();
        self.set_center(center.x, center.y, zoom_to_fit(geometry));
    }
}

/// Destination for printed values
pub trait OutputSink {
    fn print(&mut self, label: Option<&str>, value: &dyn fmt::Display);
}

/// Largest web-map zoom level at which the geometry's bounds fit one 360 degree tile
pub fn zoom_to_fit(geometry: &Geometry) -> u8 {
    let bounds = geometry.bounds();
    let span = bounds.width().max(bounds.height());
    if span <= 0.0 {
        return POINT_ZOOM;
    }
    (360.0 / span).log2().floor().clamp(0.0, MAX_ZOOM as f64) as u8
}

/// Description of a registered layer
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSummary {
    Image {
        bands: Vec<String>,
        valid_pixels: usize,
        /// Range of displayed values, `None` without valid samples
        value_range: Option<(f64, f64)>,
        /// Share of displayed samples outside [min, max]
        clipped_fraction: f64,
    },
    Geometry {
        description: String,
        color: String,
    },
}

/// A layer as recorded by `LayerRegistry`
#[derive(Debug, Clone, PartialEq)]
pub struct MapLayer {
    pub name: String,
    pub summary: LayerSummary,
}

/// Current map view
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Point,
    pub zoom: u8,
}

/// Map sink that records layers in order and logs them
#[derive(Debug, Default)]
pub struct LayerRegistry {
    layers: Vec<MapLayer>,
    view: Option<MapView>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        LayerRegistry::default()
    }

    pub fn layers(&self) -> &[MapLayer] {
        &self.layers
    }

    pub fn layer_names(&self) -> Vec<&str> {
        self.layers.iter().map(|l| l.name.as_str()).collect()
    }

    pub fn view(&self) -> Option<MapView> {
        self.view
    }

    fn summarize_image(image: &RasterImage, vis: &VisParams) -> RasterResult<LayerSummary> {
        let bands = vis.resolve_bands(image)?;

        let mut range: Option<(f64, f64)> = None;
        let mut total = 0usize;
        let mut clipped = 0usize;
        for name in &bands {
            let band = image.band(name)?;
            for (i, value) in band.values.iter().enumerate() {
                if !image.is_valid(i) || !value.is_finite() {
                    continue;
                }
                total += 1;
                if *value < vis.min || *value > vis.max {
                    clipped += 1;
                }
                range = Some(match range {
                    Some((lo, hi)) => (lo.min(*value), hi.max(*value)),
                    None => (*value, *value),
                });
            }
        }

        Ok(LayerSummary::Image {
            bands: bands.iter().map(|b| b.to_string()).collect(),
            valid_pixels: image.valid_count(),
            value_range: range,
            clipped_fraction: if total == 0 { 0.0 } else { clipped as f64 / total as f64 },
        })
    }
}

impl MapSink for LayerRegistry {
    fn add_layer(&mut self, layer: Layer<'_>, name: &str) -> RasterResult<()> {
        let summary = match layer {
            Layer::Image { image, vis } => Self::summarize_image(image, vis)?,
            Layer::Geometry { geometry, vis } => LayerSummary::Geometry {
                description: geometry.to_string(),
                color: vis.color.to_hex(),
            },
        };

        info!("Layer '{}': {}", name, summary);
        self.layers.push(MapLayer { name: name.to_string(), summary });
        Ok(())
    }

    fn set_center(&mut self, lon: f64, lat: f64, zoom: u8) {
        info!("Map center: ({:.4}, {:.4}) zoom {}", lon, lat, zoom);
        self.view = Some(MapView { center: Point::new(lon, lat), zoom });
    }
}

impl fmt::Display for LayerSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LayerSummary::Image { bands, valid_pixels, value_range, clipped_fraction } => {
                write!(f, "image [{}], {} valid pixels", bands.join(", "), valid_pixels)?;
                if let Some((lo, hi)) = value_range {
                    write!(f, ", values {:.4}..{:.4}", lo, hi)?;
                }
                write!(f, ", {:.1}% outside display range", clipped_fraction * 100.0)
            }
            LayerSummary::Geometry { description, color } => write!(f, "{} #{}", description, color),
        }
    }
}

/// Output sink writing to stdout
#[derive(Debug, Default)]
pub struct ConsoleOutput;

impl OutputSink for ConsoleOutput {
    fn print(&mut self, label: Option<&str>, value: &dyn fmt::Display) {
        match label {
            Some(label) => println!("{} {}", label, value),
            None => println!("{}", value),
        }
    }
}

/// Output sink keeping printed lines in memory
#[derive(Debug, Default)]
pub struct RecordingOutput {
    pub lines: Vec<String>,
}

impl OutputSink for RecordingOutput {
    fn print(&mut self, label: Option<&str>, value: &dyn fmt::Display) {
        self.lines.push(match label {
            Some(label) => format!("{} {}", label, value),
            None => value.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::tests::test_utils::grid_image;
    use crate::visualization::color::Color;

    #[test]
    fn test_registry_records_layers_in_order() {
        let image = grid_image("median", 2, 1, &[("NDVI", vec![-0.5, 2.0])]);
        let vis = VisParams::palette(-1.0, 1.0, vec![Color::new(0, 0, 255), Color::new(0, 128, 0)]);
        let region = Point::new(-105.6995, 40.0995).buffer(700.0);
        let region_vis = GeometryVis { color: Color::parse("FF0000").unwrap() };

        let mut registry = LayerRegistry::new();
        registry.add_layer(Layer::Image { image: &image, vis: &vis }, "NDVI").unwrap();
        registry.add_layer(Layer::Geometry { geometry: &region, vis: &region_vis }, "poly1").unwrap();

        assert_eq!(registry.layer_names(), vec!["NDVI", "poly1"]);
        match &registry.layers()[0].summary {
            LayerSummary::Image { valid_pixels, value_range, clipped_fraction, .. } => {
                assert_eq!(*valid_pixels, 2);
                assert_eq!(*value_range, Some((-0.5, 2.0)));
                assert_eq!(*clipped_fraction, 0.5);
            }
            other => panic!("unexpected summary {:?}", other),
        }
    }

    #[test]
    fn test_invalid_vis_is_rejected() {
        let image = grid_image("median", 1, 1, &[("B4", vec![1.0])]);
        let vis = VisParams::rgb(["B4", "B3", "B2"], 0.0, 3000.0);
        let mut registry = LayerRegistry::new();
        assert!(registry.add_layer(Layer::Image { image: &image, vis: &vis }, "SR").is_err());
        assert!(registry.layers().is_empty());
    }

    #[test]
    fn test_center_object_zoom() {
        let mut registry = LayerRegistry::new();
        let region = Point::new(-105.6185272, 40.0693832).buffer(700.0);
        registry.center_object(&region);

        let view = registry.view().unwrap();
        assert_eq!(view.center, Point::new(-105.6185272, 40.0693832));
        assert_eq!(view.zoom, 14);
        assert_eq!(zoom_to_fit(&Geometry::Point(Point::new(0.0, 0.0))), POINT_ZOOM);
    }

    #[test]
    fn test_recording_output() {
        let mut output = RecordingOutput::default();
        output.print(Some("Polygon area: "), &1.5);
        output.print(None, &"done");
        assert_eq!(output.lines, vec!["Polygon area:  1.5", "done"]);
    }
}
