//! In-memory raster image with named bands and a validity mask
//!
//! Images are immutable: every operation that changes bands or mask
//! returns a new `RasterImage`.

use chrono::NaiveDate;
use log::debug;

use crate::coordinate::{BoundingBox, Point};
use crate::raster::band::Band;
use crate::raster::errors::{RasterError, RasterResult};

/// Geotransform coefficients: [origin_x, pixel_width, 0, origin_y, 0, pixel_height]
///
/// Coordinates are EPSG:4326 degrees, `pixel_height` is typically negative.
pub type GeoTransform = [f64; 6];

/// Pixel sizes must be finite and non-zero, origins finite
fn validate_geotransform(geotransform: &GeoTransform) -> RasterResult<()> {
    let [origin_x, pixel_width, _, origin_y, _, pixel_height] = *geotransform;
    if !origin_x.is_finite() || !origin_y.is_finite() {
        return Err(RasterError::InvalidGeometry(format!(
            "geotransform origin ({}, {}) is not finite", origin_x, origin_y
        )));
    }
    for (axis, size) in [("width", pixel_width), ("height", pixel_height)] {
        if !size.is_finite() || size == 0.0 {
            return Err(RasterError::InvalidGeometry(format!(
                "pixel {} must be finite and non-zero, got {}", axis, size
            )));
        }
    }
    Ok(())
}

/// A multi-band raster image
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    id: String,
    date: Option<NaiveDate>,
    width: usize,
    height: usize,
    geotransform: GeoTransform,
    bands: Vec<Band>,
    /// `true` = valid pixel
    mask: Vec<bool>,
}

impl RasterImage {
    /// Create a new image with every pixel valid
    ///
    /// # Arguments
    /// * `id` - Scene identifier
    /// * `width` - Number of columns
    /// * `height` - Number of rows
    /// * `geotransform` - Pixel to geographic coordinate mapping
    /// * `bands` - Bands, each `width * height` samples long
    ///
    /// # Returns
    /// The image, `GridMismatch` if the size overflows or a band has the
    /// wrong length, or `InvalidGeometry` for a degenerate geotransform
    pub fn new(
        id: &str,
        width: usize,
        height: usize,
        geotransform: GeoTransform,
        bands: Vec<Band>,
    ) -> RasterResult<Self> {
        let pixel_count = width.checked_mul(height).ok_or_else(|| {
            RasterError::GridMismatch(format!("{}x{} pixels do not fit in memory", width, height))
        })?;
        validate_geotransform(&geotransform)?;
        for band in &bands {
            if band.len() != pixel_count {
                return Err(RasterError::GridMismatch(format!(
                    "band '{}' has {} samples, expected {}x{} = {}",
                    band.name, band.len(), width, height, pixel_count
                )));
            }
        }

        Ok(RasterImage {
            id: id.to_string(),
            date: None,
            width,
            height,
            geotransform,
            bands,
            mask: vec![true; pixel_count],
        })
    }

    /// Attach an acquisition date
    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    pub fn mask(&self) -> &[bool] {
        &self.mask
    }

    /// Names of all bands in order
    pub fn band_names(&self) -> Vec<&str> {
        self.bands.iter().map(|b| b.name.as_str()).collect()
    }

    /// Look up a band by name
    pub fn band(&self, name: &str) -> RasterResult<&Band> {
        self.bands.iter()
            .find(|b| b.name == name)
            .ok_or_else(|| RasterError::BandNotFound(name.to_string()))
    }

    /// Check whether a pixel index is valid under the mask
    pub fn is_valid(&self, index: usize) -> bool {
        self.mask.get(index).copied().unwrap_or(false)
    }

    /// Number of pixels currently valid
    pub fn valid_count(&self) -> usize {
        self.mask.iter().filter(|v| **v).count()
    }

    /// Rename every band, in order
    pub fn rename(&self, names: &[&str]) -> RasterResult<Self> {
        if names.len() != self.bands.len() {
            return Err(RasterError::GenericError(format!(
                "cannot rename {} bands with {} names", self.bands.len(), names.len()
            )));
        }

        let bands = self.bands.iter()
            .zip(names)
            .map(|(band, name)| band.renamed(name))
            .collect();

        Ok(RasterImage {
            bands,
            ..self.clone()
        })
    }

    /// Narrow the validity mask
    ///
    /// A pixel stays valid only if it was valid before and `mask` keeps it.
    /// Pixel values are not touched.
    pub fn update_mask(&self, mask: &[bool]) -> RasterResult<Self> {
        if mask.len() != self.pixel_count() {
            return Err(RasterError::GridMismatch(format!(
                "mask has {} entries, image '{}' has {} pixels",
                mask.len(), self.id, self.pixel_count()
            )));
        }

        let mask: Vec<bool> = self.mask.iter()
            .zip(mask)
            .map(|(old, new)| *old && *new)
            .collect();
        debug!("Updated mask of '{}': {} of {} pixels valid",
               self.id, mask.iter().filter(|v| **v).count(), mask.len());

        Ok(RasterImage {
            mask,
            ..self.clone()
        })
    }

    /// Build an image on the grid of `self` from new bands and a new mask
    pub(crate) fn derive(&self, id: &str, bands: Vec<Band>, mask: Vec<bool>) -> RasterResult<Self> {
        let mut image = RasterImage::new(id, self.width, self.height, self.geotransform, bands)?;
        if mask.len() != image.pixel_count() {
            return Err(RasterError::GridMismatch(format!(
                "mask has {} entries, expected {}", mask.len(), image.pixel_count()
            )));
        }
        image.mask = mask;
        Ok(image)
    }

    /// Check whether another image shares this pixel grid
    pub fn same_grid(&self, other: &RasterImage) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.geotransform.iter()
                .zip(other.geotransform.iter())
                .all(|(a, b)| (a - b).abs() < 1e-9)
    }

    /// Geographic footprint of the image
    pub fn footprint(&self) -> BoundingBox {
        let [origin_x, pixel_width, _, origin_y, _, pixel_height] = self.geotransform;
        let x_end = origin_x + pixel_width * self.width as f64;
        let y_end = origin_y + pixel_height * self.height as f64;

        BoundingBox::new(
            origin_x.min(x_end),
            origin_y.min(y_end),
            origin_x.max(x_end),
            origin_y.max(y_end),
        )
    }

    /// Row-major index of the pixel containing a location, if inside the image
    pub fn pixel_index_at(&self, location: &Point) -> Option<usize> {
        let [origin_x, pixel_width, _, origin_y, _, pixel_height] = self.geotransform;
        let col = ((location.x - origin_x) / pixel_width).floor();
        let row = ((location.y - origin_y) / pixel_height).floor();

        if !col.is_finite() || !row.is_finite() {
            return None;
        }
        if col < 0.0 || row < 0.0 || col >= self.width as f64 || row >= self.height as f64 {
            return None;
        }
        Some(row as usize * self.width + col as usize)
    }
}
