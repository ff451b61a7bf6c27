//! Normalized difference band index
//!
//! `(band_a - band_b) / (band_a + band_b)` per pixel, e.g. NDVI with
//! `band_a` = near infrared and `band_b` = red.

use log::info;

use crate::raster::errors::RasterResult;
use crate::raster::{Band, RasterImage};

/// Name of the band produced by `normalized_difference`
pub const NORMALIZED_DIFFERENCE_BAND: &str = "nd";

/// Normalized difference of two samples
///
/// Returns `None` when either sample is not finite or is negative, or when
/// `a + b` is zero, which includes `a = b = 0`. Every defined value lies
/// in `[-1, 1]`.
pub fn normalized_difference_value(a: f64, b: f64) -> Option<f64> {
    if !a.is_finite() || !b.is_finite() || a < 0.0 || b < 0.0 {
        return None;
    }
    let sum = a + b;
    if sum == 0.0 {
        return None;
    }
    Some((a - b) / sum)
}

/// Compute the normalized difference of two bands of an image
///
/// The result has a single band named `nd`. Pixels that are masked in the
/// input, or whose index is undefined, are masked and hold `NaN`.
///
/// # Arguments
/// * `image` - Source image
/// * `band_a` - Band added in the numerator (e.g. "B5", near infrared)
/// * `band_b` - Band subtracted in the numerator (e.g. "B4", red)
pub fn normalized_difference(image: &RasterImage, band_a: &str, band_b: &str) -> RasterResult<RasterImage> {
    let a = image.band(band_a)?;
    let b = image.band(band_b)?;

    let mut mask = Vec::with_capacity(image.pixel_count());
    let values: Vec<f64> = a.values.iter()
        .zip(&b.values)
        .enumerate()
        .map(|(i, (va, vb))| {
            match normalized_difference_value(*va, *vb).filter(|_| image.is_valid(i)) {
                Some(index) => {
                    mask.push(true);
                    index
                }
                None => {
                    mask.push(false);
                    f64::NAN
                }
            }
        })
        .collect();

    let id = format!("{}_nd", image.id());
    let result = image.derive(&id, vec![Band::new(NORMALIZED_DIFFERENCE_BAND, values)], mask)?;
    info!("Normalized difference ({} - {}) / ({} + {}): {} valid pixels",
          band_a, band_b, band_a, band_b, result.valid_count());
    Ok(result)
}

/// NDVI from near-infrared and red bands, with the result band named `name`
pub fn ndvi(image: &RasterImage, nir: &str, red: &str, name: &str) -> RasterResult<RasterImage> {
    normalized_difference(image, nir, red)?.rename(&[name])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raster::tests::test_utils::grid_image;

    #[test]
    fn test_formula() {
        assert_eq!(normalized_difference_value(3000.0, 1000.0), Some(0.5));
        assert_eq!(normalized_difference_value(1234.0, 1234.0), Some(0.0));
        assert_eq!(normalized_difference_value(0.0, 0.0), None);
        assert_eq!(normalized_difference_value(f64::NAN, 1.0), None);
    }

    #[test]
    fn test_negative_samples_are_undefined() {
        assert_eq!(normalized_difference_value(-100.0, 50.0), None);
        assert_eq!(normalized_difference_value(50.0, -100.0), None);
        assert_eq!(normalized_difference_value(-1.0, -1.0), None);
        assert_eq!(normalized_difference_value(0.0, 25.0), Some(-1.0));

        let image = grid_image("median", 1, 1, &[("B5", vec![-100.0]), ("B4", vec![50.0])]);
        let result = ndvi(&image, "B5", "B4", "NDVI").unwrap();
        assert_eq!(result.mask(), &[false]);
        assert!(result.band("NDVI").unwrap().values[0].is_nan());
    }

    #[test]
    fn test_defined_values_stay_in_range() {
        let samples = [-3000.0, -1.0, -1e-9, 0.0, 1e-9, 0.5, 1.0, 42.0, 3000.0, 1e12, f64::INFINITY, f64::NAN];
        for a in samples {
            for b in samples {
                if let Some(value) = normalized_difference_value(a, b) {
                    assert!((-1.0..=1.0).contains(&value), "nd({}, {}) = {}", a, b, value);
                }
            }
        }
    }

    #[test]
    fn test_image_index_masks_undefined_pixels() {
        let image = grid_image("median", 2, 2, &[
            ("B5", vec![3000.0, 0.0, 500.0, 800.0]),
            ("B4", vec![1000.0, 0.0, 500.0, 200.0]),
        ]).update_mask(&[true, true, true, false]).unwrap();

        let nd = normalized_difference(&image, "B5", "B4").unwrap();
        assert_eq!(nd.band_names(), vec![NORMALIZED_DIFFERENCE_BAND]);
        assert_eq!(nd.mask(), &[true, false, true, false]);

        let values = &nd.band(NORMALIZED_DIFFERENCE_BAND).unwrap().values;
        assert_eq!(values[0], 0.5);
        assert!(values[1].is_nan());
        assert_eq!(values[2], 0.0);
        assert!(values[3].is_nan());
    }

    #[test]
    fn test_ndvi_renames_band() {
        let image = grid_image("median", 1, 1, &[("B5", vec![0.3]), ("B4", vec![0.1])]);
        let result = ndvi(&image, "B5", "B4", "NDVI").unwrap();
        assert_eq!(result.band_names(), vec!["NDVI"]);
        assert!((result.band("NDVI").unwrap().values[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_unknown_band() {
        let image = grid_image("median", 1, 1, &[("B4", vec![1.0])]);
        assert!(normalized_difference(&image, "B5", "B4").is_err());
    }
}
