//! Coordinate handling for geospatial data
//!
//! This module provides points, bounding boxes and region geometries
//! in geographic coordinates, plus the geodesic helpers behind them.

mod bbox;
mod point;
mod transform;
mod geometry;

// Re-export key types
pub use self::bbox::BoundingBox;
pub use self::point::Point;
pub use self::transform::CoordinateTransformer;
pub use self::geometry::{Geometry, square_meters_to_square_kilometers, SQUARE_METERS_PER_SQUARE_KILOMETER};
