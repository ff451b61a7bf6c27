//! Per-pixel median compositing
//!
//! The composite takes, for each band and each pixel, the median of the
//! samples of every image that is valid at that pixel. All images must
//! share one pixel grid.

use log::{debug, info};

use crate::raster::errors::{RasterError, RasterResult};
use crate::raster::{Band, ImageCollection, RasterImage};

/// Identifier given to composite images
pub const MEDIAN_IMAGE_ID: &str = "median";

/// Median of a slice of finite values, `None` when empty
///
/// An even count yields the mean of the two middle values.
pub fn median_of(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));

    let count = values.len();
    let median = if count % 2 == 0 {
        (values[count / 2 - 1] + values[count / 2]) / 2.0
    } else {
        values[count / 2]
    };
    Some(median)
}

/// Composite a collection into its per-pixel median
///
/// The band list comes from the first image. A pixel of the result is
/// valid when at least one image is valid there; a band with no finite
/// contributing sample at a valid pixel holds `NaN`.
///
/// # Returns
/// The composite, `EmptyCollection` for an empty input, or `GridMismatch`
/// if the images do not line up
pub fn median(collection: &ImageCollection) -> RasterResult<RasterImage> {
    let images = collection.images();
    let first = images.first().ok_or(RasterError::EmptyCollection)?;

    if let Some(other) = images.iter().find(|image| !first.same_grid(image)) {
        return Err(RasterError::GridMismatch(format!(
            "image '{}' is not on the grid of '{}'", other.id(), first.id()
        )));
    }

    let pixel_count = first.pixel_count();
    let band_names = first.band_names();
    debug!("Median composite of {} images, bands {:?}", images.len(), band_names);

    // Resolve every band of every image up front so a missing band fails early
    let mut per_band: Vec<Vec<&Band>> = Vec::with_capacity(band_names.len());
    for name in &band_names {
        let bands = images.iter()
            .map(|image| image.band(name))
            .collect::<RasterResult<Vec<&Band>>>()?;
        per_band.push(bands);
    }

    let mask: Vec<bool> = (0..pixel_count)
        .map(|i| images.iter().any(|image| image.is_valid(i)))
        .collect();

    let mut samples = Vec::with_capacity(images.len());
    let bands = band_names.iter()
        .zip(&per_band)
        .map(|(name, sources)| {
            let values = (0..pixel_count)
                .map(|i| {
                    samples.clear();
                    samples.extend(
                        images.iter()
                            .zip(sources)
                            .filter(|(image, _)| image.is_valid(i))
                            .map(|(_, band)| band.values[i])
                            .filter(|v| !v.is_nan()),
                    );
                    median_of(&mut samples).unwrap_or(f64::NAN)
                })
                .collect();
            Band::new(name, values)
        })
        .collect();

    let composite = first.derive(MEDIAN_IMAGE_ID, bands, mask)?;
    info!("Median composite: {} of {} pixels have a clear observation",
          composite.valid_count(), pixel_count);
    Ok(composite)
}
