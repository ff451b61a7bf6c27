//! Geodesic helpers on a spherical Earth

use super::point::Point;
use super::bbox::BoundingBox;
use std::f64::consts::PI;

/// Transformer for converting between meters and geographic degrees
pub struct CoordinateTransformer;

impl CoordinateTransformer {
    /// Earth radius in meters
    pub const EARTH_RADIUS: f64 = 6378137.0;

    /// Length of one degree of latitude in meters
    pub fn meters_per_degree(&self) -> f64 {
        Self::EARTH_RADIUS * PI / 180.0
    }

    /// Convert a distance in meters to (longitude, latitude) degree spans at a latitude
    pub fn meters_to_degrees(&self, meters: f64, lat: f64) -> (f64, f64) {
        let lat_deg = meters / self.meters_per_degree();
        // Longitude degrees shrink towards the poles
        let cos_lat = lat.to_radians().cos().max(1e-12);
        let lon_deg = meters / (self.meters_per_degree() * cos_lat);
        (lon_deg, lat_deg)
    }

    /// Great-circle distance between two points in meters (haversine)
    pub fn distance(&self, a: &Point, b: &Point) -> f64 {
        let phi1 = a.y.to_radians();
        let phi2 = b.y.to_radians();
        let d_phi = (b.y - a.y).to_radians();
        let d_lambda = (b.x - a.x).to_radians();

        let h = (d_phi / 2.0).sin().powi(2)
            + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        2.0 * Self::EARTH_RADIUS * h.sqrt().min(1.0).asin()
    }

    /// Create a bounding box covering a circle of `radius_m` meters around a point
    pub fn create_buffer(&self, center: &Point, radius_m: f64) -> BoundingBox {
        let (lon_buffer, lat_buffer) = self.meters_to_degrees(radius_m, center.y);

        BoundingBox::new(
            center.x - lon_buffer,
            center.y - lat_buffer,
            center.x + lon_buffer,
            center.y + lat_buffer,
        )
    }

    /// Area of a lon/lat ring on the sphere in square meters
    ///
    /// The ring may be open or closed. Winding order does not matter.
    pub fn ring_area(&self, ring: &[Point]) -> f64 {
        if ring.len() < 3 {
            return 0.0;
        }

        let mut total = 0.0;
        for i in 0..ring.len() {
            let p1 = ring[i];
            let p2 = ring[(i + 1) % ring.len()];
            total += (p2.x - p1.x).to_radians()
                * (2.0 + p1.y.to_radians().sin() + p2.y.to_radians().sin());
        }

        (total * Self::EARTH_RADIUS * Self::EARTH_RADIUS / 2.0).abs()
    }
}
