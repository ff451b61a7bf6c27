//! Region geometries used for filtering, display and reduction

use std::fmt;

use super::bbox::BoundingBox;
use super::point::Point;
use super::transform::CoordinateTransformer;
use crate::raster::errors::{RasterError, RasterResult};

/// Square meters in one square kilometer
pub const SQUARE_METERS_PER_SQUARE_KILOMETER: f64 = 1000.0 * 1000.0;

/// A spatial region in geographic coordinates
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    /// A single location
    Point(Point),
    /// A point buffered by a distance in meters
    Circle { center: Point, radius_m: f64 },
    /// A simple polygon given by its outer ring
    Polygon { ring: Vec<Point> },
}

impl Geometry {
    /// Create a polygon, rejecting rings with fewer than three distinct vertices
    pub fn polygon(mut ring: Vec<Point>) -> RasterResult<Self> {
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() < 3 {
            return Err(RasterError::InvalidGeometry(format!(
                "polygon needs at least 3 vertices, got {}", ring.len()
            )));
        }
        Ok(Geometry::Polygon { ring })
    }

    /// Bounding box in degrees
    pub fn bounds(&self) -> BoundingBox {
        match self {
            Geometry::Point(p) => BoundingBox::new(p.x, p.y, p.x, p.y),
            Geometry::Circle { center, radius_m } => {
                CoordinateTransformer.create_buffer(center, *radius_m)
            }
            Geometry::Polygon { ring } => {
                // Constructed through `polygon`, so the ring is never empty
                BoundingBox::from_points(ring).unwrap_or(BoundingBox::new(0.0, 0.0, 0.0, 0.0))
            }
        }
    }

    /// Representative center point
    pub fn centroid(&self) -> Point {
        match self {
            Geometry::Point(p) => *p,
            Geometry::Circle { center, .. } => *center,
            Geometry::Polygon { ring } => {
                let n = ring.len() as f64;
                let (sx, sy) = ring.iter().fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
                Point::new(sx / n, sy / n)
            }
        }
    }

    /// Area in square meters
    pub fn area(&self) -> f64 {
        match self {
            Geometry::Point(_) => 0.0,
            Geometry::Circle { radius_m, .. } => std::f64::consts::PI * radius_m * radius_m,
            Geometry::Polygon { ring } => CoordinateTransformer.ring_area(ring),
        }
    }

    /// Check whether a location lies inside the region
    ///
    /// A point geometry has no interior and contains nothing.
    pub fn contains(&self, location: &Point) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::Circle { center, radius_m } => {
                CoordinateTransformer.distance(center, location) <= *radius_m
            }
            Geometry::Polygon { ring } => ring_contains(ring, location),
        }
    }
}

/// Convert square meters to square kilometers
pub fn square_meters_to_square_kilometers(square_meters: f64) -> f64 {
    square_meters / SQUARE_METERS_PER_SQUARE_KILOMETER
}

/// Even-odd ray casting test
fn ring_contains(ring: &[Point], location: &Point) -> bool {
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (pi, pj) = (ring[i], ring[j]);
        if (pi.y > location.y) != (pj.y > location.y) {
            let x_cross = (pj.x - pi.x) * (location.y - pi.y) / (pj.y - pi.y) + pi.x;
            if location.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Geometry::Point(p) => write!(f, "Point({:.6}, {:.6})", p.x, p.y),
            Geometry::Circle { center, radius_m } => write!(
                f, "Circle(center=({:.6}, {:.6}), radius={} m)", center.x, center.y, radius_m
            ),
            Geometry::Polygon { ring } => write!(f, "Polygon({} vertices)", ring.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_area_conversion() {
        assert_eq!(square_meters_to_square_kilometers(4_900_000.0), 4.9);
    }

    #[test]
    fn test_buffered_point_area() {
        let region = Point::new(-105.6185272, 40.0693832).buffer(700.0);
        let km2 = square_meters_to_square_kilometers(region.area());
        assert!((km2 - 1.539380).abs() < 1e-5);
    }

    #[test]
    fn test_circle_contains() {
        let center = Point::new(-105.6, 40.0);
        let region = center.buffer(700.0);
        assert!(region.contains(&center));

        let (_, lat_step) = CoordinateTransformer.meters_to_degrees(800.0, 40.0);
        assert!(!region.contains(&Point::new(-105.6, 40.0 + lat_step)));
    }

    #[test]
    fn test_polygon_contains_and_validation() {
        let square = Geometry::polygon(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
            Point::new(0.0, 0.0),
        ]).unwrap();
        assert!(square.contains(&Point::new(0.5, 0.5)));
        assert!(!square.contains(&Point::new(1.5, 0.5)));
        assert_eq!(square.centroid(), Point::new(0.5, 0.5));

        assert!(Geometry::polygon(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).is_err());
    }

    #[test]
    fn test_point_has_no_area() {
        let p = Geometry::Point(Point::new(1.0, 2.0));
        assert_eq!(p.area(), 0.0);
        assert!(!p.contains(&Point::new(1.0, 2.0)));
        assert_eq!(p.bounds(), BoundingBox::new(1.0, 2.0, 1.0, 2.0));
    }
}
