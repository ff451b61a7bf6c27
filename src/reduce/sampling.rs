//! Sampling grid used by region reductions
//!
//! A region is sampled at cell centers of a regular grid whose spacing is
//! the requested scale in meters. The grid spans the region's bounding box,
//! so its size is what the maximum-pixel cap is checked against.

use log::debug;

use crate::coordinate::{CoordinateTransformer, Geometry, Point};
use crate::raster::errors::{RasterError, RasterResult};
use crate::raster::RasterImage;

/// Locations of a region sampled at `scale` meters
///
/// # Returns
/// The sample locations inside the region, `TooManyPixels` when the grid
/// over the bounding box exceeds `max_pixels`
pub fn sample_locations(geometry: &Geometry, scale: f64, max_pixels: u64) -> RasterResult<Vec<Point>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(RasterError::GenericError(format!("Scale must be a positive number of meters, got {}", scale)));
    }

    if let Geometry::Point(p) = geometry {
        return Ok(vec![*p]);
    }

    let bounds = geometry.bounds();
    let (lon_step, lat_step) = CoordinateTransformer.meters_to_degrees(scale, bounds.center().y);
    let cols = ((bounds.width() / lon_step).ceil() as u64).max(1);
    let rows = ((bounds.height() / lat_step).ceil() as u64).max(1);

    let required = rows.saturating_mul(cols);
    if required > max_pixels {
        return Err(RasterError::TooManyPixels { required, max: max_pixels });
    }

    let mut locations = Vec::new();
    for row in 0..rows {
        let y = bounds.max_y - (row as f64 + 0.5) * lat_step;
        for col in 0..cols {
            let location = Point::new(bounds.min_x + (col as f64 + 0.5) * lon_step, y);
            if geometry.contains(&location) {
                locations.push(location);
            }
        }
    }

    debug!("Sampled {} at {} m: {}x{} grid, {} locations inside",
           geometry, scale, cols, rows, locations.len());
    Ok(locations)
}

/// Valid, finite samples of one band at the given locations
///
/// Locations outside the image or on masked pixels are skipped.
pub fn band_samples(image: &RasterImage, band: &str, locations: &[Point]) -> RasterResult<Vec<f64>> {
    let band = image.band(band)?;
    Ok(locations.iter()
        .filter_map(|location| image.pixel_index_at(location))
        .filter(|index| image.is_valid(*index))
        .map(|index| band.values[index])
        .filter(|value| value.is_finite())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_sample_count() {
        let region = Point::new(-105.6185272, 40.0693832).buffer(700.0);
        let locations = sample_locations(&region, 30.0, 1_000_000_000).unwrap();
        // About pi * (700 / 30)^2 cells fall inside the circle
        let expected = std::f64::consts::PI * (700.0f64 / 30.0).powi(2);
        let ratio = locations.len() as f64 / expected;
        assert!(ratio > 0.95 && ratio < 1.05, "got {} locations", locations.len());
    }

    #[test]
    fn test_max_pixels_cap() {
        let region = Point::new(0.0, 0.0).buffer(700.0);
        match sample_locations(&region, 30.0, 100) {
            Err(RasterError::TooManyPixels { required, max }) => {
                assert_eq!(max, 100);
                assert!(required > 100);
            }
            other => panic!("expected TooManyPixels, got {:?}", other),
        }
    }

    #[test]
    fn test_point_and_bad_scale() {
        let point = Geometry::Point(Point::new(1.0, 2.0));
        assert_eq!(sample_locations(&point, 30.0, 1).unwrap(), vec![Point::new(1.0, 2.0)]);
        assert!(sample_locations(&point, 0.0, 1).is_err());
    }
}
