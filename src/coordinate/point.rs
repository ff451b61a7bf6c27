//! Point structure for representing coordinates

use super::geometry::Geometry;

/// A point in geographic coordinates (EPSG:4326)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    /// X coordinate (longitude in degrees)
    pub x: f64,
    /// Y coordinate (latitude in degrees)
    pub y: f64,
}

impl Point {
    /// Create a new point from longitude and latitude
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Create a point from a `[lon, lat]` pair
    pub fn from_lon_lat(coords: [f64; 2]) -> Self {
        Point::new(coords[0], coords[1])
    }

    /// Buffer this point into a circular region
    ///
    /// # Arguments
    /// * `radius_m` - Buffer distance in meters
    pub fn buffer(&self, radius_m: f64) -> Geometry {
        Geometry::Circle { center: *self, radius_m }
    }
}
