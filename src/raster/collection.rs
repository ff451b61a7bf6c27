//! Image collections and the date range used to filter them

use std::fmt;

use chrono::NaiveDate;
use log::{debug, info};

use crate::coordinate::Geometry;
use crate::raster::errors::{RasterError, RasterResult};
use crate::raster::image::RasterImage;

/// Half-open date interval `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Create a range, rejecting `end < start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> RasterResult<Self> {
        if end < start {
            return Err(RasterError::ConfigError(format!(
                "date range ends ({}) before it starts ({})", end, start
            )));
        }
        Ok(DateRange { start, end })
    }

    /// Parse a range from two `YYYY-M-D` strings; zero padding is optional
    pub fn parse(start: &str, end: &str) -> RasterResult<Self> {
        DateRange::new(parse_date(start)?, parse_date(end)?)
    }

    /// Check whether a date lies in the range (end exclusive)
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// Parse a `YYYY-M-D` date
pub fn parse_date(text: &str) -> RasterResult<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| RasterError::ConfigError(format!("Invalid date '{}': {}", text, e)))
}

/// An ordered set of images
///
/// Filtering and mapping never modify a collection; they return a new one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageCollection {
    images: Vec<RasterImage>,
}

impl ImageCollection {
    /// Create a collection from images
    pub fn new(images: Vec<RasterImage>) -> Self {
        ImageCollection { images }
    }

    pub fn images(&self) -> &[RasterImage] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Keep the images whose footprint intersects the geometry
    ///
    /// For a point geometry the point must fall inside the footprint.
    pub fn filter_bounds(&self, geometry: &Geometry) -> Self {
        let bounds = geometry.bounds();
        let images: Vec<RasterImage> = self.images.iter()
            .filter(|image| image.footprint().intersects(&bounds))
            .cloned()
            .collect();

        debug!("filter_bounds({}): {} of {} images kept", geometry, images.len(), self.images.len());
        ImageCollection { images }
    }

    /// Keep the dated images acquired inside the range
    pub fn filter_date(&self, range: &DateRange) -> Self {
        let images: Vec<RasterImage> = self.images.iter()
            .filter(|image| image.date().is_some_and(|d| range.contains(d)))
            .cloned()
            .collect();

        debug!("filter_date({}): {} of {} images kept", range, images.len(), self.images.len());
        ImageCollection { images }
    }

    /// Apply a function to every image, stopping at the first error
    pub fn map<F>(&self, f: F) -> RasterResult<Self>
    where
        F: Fn(&RasterImage) -> RasterResult<RasterImage>,
    {
        let images = self.images.iter()
            .map(f)
            .collect::<RasterResult<Vec<RasterImage>>>()?;
        info!("Mapped function over {} images", images.len());
        Ok(ImageCollection { images })
    }
}

impl FromIterator<RasterImage> for ImageCollection {
    fn from_iter<I: IntoIterator<Item = RasterImage>>(iter: I) -> Self {
        ImageCollection::new(iter.into_iter().collect())
    }
}
