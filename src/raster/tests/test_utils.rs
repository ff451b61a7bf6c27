use chrono::NaiveDate;

use crate::raster::{Band, GeoTransform, RasterImage};

/// Geotransform of a small grid near the Front Range: 0.001 degree pixels
pub fn sample_geotransform() -> GeoTransform {
    [-105.70, 0.001, 0.0, 40.10, 0.0, -0.001]
}

/// Creates an image on the sample grid from (band name, samples) pairs
pub fn grid_image(id: &str, width: usize, height: usize, bands: &[(&str, Vec<f64>)]) -> RasterImage {
    let bands = bands.iter()
        .map(|(name, values)| Band::new(name, values.clone()))
        .collect();
    RasterImage::new(id, width, height, sample_geotransform(), bands).unwrap()
}

/// Same as `grid_image`, with an acquisition date
pub fn dated_image(id: &str, date: &str, width: usize, height: usize, bands: &[(&str, Vec<f64>)]) -> RasterImage {
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
    grid_image(id, width, height, bands).with_date(date)
}
