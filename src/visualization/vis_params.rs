//! Display parameters for map layers and charts

use serde::Deserialize;

use crate::raster::errors::{RasterError, RasterResult};
use crate::raster::RasterImage;
use crate::visualization::color::Color;

/// How an image layer is displayed
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct VisParams {
    /// One band (optionally with a palette) or three bands as RGB
    pub bands: Vec<String>,
    pub min: f64,
    pub max: f64,
    pub gamma: Option<f64>,
    pub palette: Vec<Color>,
}

impl Default for VisParams {
    fn default() -> Self {
        VisParams {
            bands: Vec::new(),
            min: 0.0,
            max: 1.0,
            gamma: None,
            palette: Vec::new(),
        }
    }
}

impl VisParams {
    /// RGB display of three bands
    pub fn rgb(bands: [&str; 3], min: f64, max: f64) -> Self {
        VisParams {
            bands: bands.iter().map(|b| b.to_string()).collect(),
            min,
            max,
            ..VisParams::default()
        }
    }

    /// Single band display through a color ramp
    pub fn palette(min: f64, max: f64, palette: Vec<Color>) -> Self {
        VisParams {
            min,
            max,
            palette,
            ..VisParams::default()
        }
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = Some(gamma);
        self
    }

    /// Bands that will be displayed for an image
    ///
    /// With no bands configured the first band of the image is shown.
    ///
    /// # Returns
    /// The band names, or an error when they cannot be displayed together
    pub fn resolve_bands<'a>(&'a self, image: &'a RasterImage) -> RasterResult<Vec<&'a str>> {
        if !(self.max > self.min) {
            return Err(RasterError::ConfigError(format!(
                "Display range is empty: min {} >= max {}", self.min, self.max
            )));
        }
        if let Some(gamma) = self.gamma {
            if !(gamma > 0.0) {
                return Err(RasterError::ConfigError(format!("Gamma must be positive, got {}", gamma)));
            }
        }

        let bands: Vec<&str> = if self.bands.is_empty() {
            image.band_names().into_iter().take(1).collect()
        } else {
            self.bands.iter().map(String::as_str).collect()
        };

        match bands.len() {
            1 => {}
            3 if self.palette.is_empty() => {}
            3 => return Err(RasterError::ConfigError("A palette needs exactly one band".to_string())),
            n => return Err(RasterError::ConfigError(format!("Expected 1 or 3 display bands, got {}", n))),
        }

        for name in &bands {
            image.band(name)?;
        }
        Ok(bands)
    }
}

/// How a geometry layer is displayed
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeometryVis {
    pub color: Color,
}

impl Default for GeometryVis {
    fn default() -> Self {
        GeometryVis { color: Color::new(255, 0, 0) }
    }
}

/// Display configuration of a histogram chart
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HistogramOptions {
    pub title: String,
    pub font_size: u32,
    pub h_axis_title: String,
    pub v_axis_title: String,
    /// Series names, one per band; band names are used when missing
    pub series_names: Vec<String>,
    /// Series colors, one per band
    pub series_colors: Vec<Color>,
    /// Upper bound on the number of buckets
    pub max_buckets: usize,
}

impl Default for HistogramOptions {
    fn default() -> Self {
        HistogramOptions {
            title: "Histogram of NDVI values in polygon".to_string(),
            font_size: 20,
            h_axis_title: "DN".to_string(),
            v_axis_title: "count of DN".to_string(),
            series_names: vec!["NDVI".to_string()],
            series_colors: vec![Color::new(0, 0, 255)],
            max_buckets: 20,
        }
    }
}

impl HistogramOptions {
    /// Display name of series `index`, falling back to `band`
    pub fn series_name<'a>(&'a self, index: usize, band: &'a str) -> &'a str {
        self.series_names.get(index).map(String::as_str).unwrap_or(band)
    }

    /// Color of series `index`, if configured
    pub fn series_color(&self, index: usize) -> Option<Color> {
        self.series_colors.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::tests::test_utils::grid_image;

    #[test]
    fn test_resolve_bands() {
        let image = grid_image("median", 1, 1, &[("B4", vec![1.0]), ("B3", vec![1.0]), ("B2", vec![1.0])]);

        let rgb = VisParams::rgb(["B4", "B3", "B2"], 0.0, 3000.0).with_gamma(1.4);
        assert_eq!(rgb.resolve_bands(&image).unwrap(), vec!["B4", "B3", "B2"]);

        let first_band = VisParams::palette(-1.0, 1.0, vec![Color::new(0, 0, 255)]);
        assert_eq!(first_band.resolve_bands(&image).unwrap(), vec!["B4"]);

        let missing = VisParams::rgb(["B4", "B3", "B9"], 0.0, 1.0);
        assert!(missing.resolve_bands(&image).is_err());

        let mut palette_rgb = VisParams::rgb(["B4", "B3", "B2"], 0.0, 1.0);
        palette_rgb.palette = vec![Color::new(0, 0, 0)];
        assert!(palette_rgb.resolve_bands(&image).is_err());

        assert!(VisParams::rgb(["B4", "B3", "B2"], 1.0, 1.0).resolve_bands(&image).is_err());
    }

    #[test]
    fn test_histogram_series_fallbacks() {
        let options = HistogramOptions::default();
        assert_eq!(options.series_name(0, "nd"), "NDVI");
        assert_eq!(options.series_name(1, "nd"), "nd");
        assert_eq!(options.series_color(0), Some(Color::new(0, 0, 255)));
        assert_eq!(options.series_color(1), None);
    }
}
