//! Tests for image collections and date ranges

use crate::coordinate::{Geometry, Point};
use crate::raster::{parse_date, DateRange, ImageCollection};
use super::test_utils::{dated_image, grid_image};

fn summer_collection() -> ImageCollection {
    ImageCollection::new(vec![
        dated_image("may", "2016-05-31", 1, 1, &[("B4", vec![1.0])]),
        dated_image("june", "2016-06-01", 1, 1, &[("B4", vec![2.0])]),
        dated_image("sept", "2016-09-15", 1, 1, &[("B4", vec![3.0])]),
        grid_image("undated", 1, 1, &[("B4", vec![4.0])]),
    ])
}

#[test]
fn test_parse_unpadded_date() {
    let range = DateRange::parse("2016-06-1", "2016-09-15").unwrap();
    assert_eq!(range.start, parse_date("2016-06-01").unwrap());
    assert!(DateRange::parse("2016-09-15", "2016-06-01").is_err());
    assert!(parse_date("June 1st").is_err());
}

#[test]
fn test_filter_date_end_is_exclusive() {
    let range = DateRange::parse("2016-06-1", "2016-09-15").unwrap();
    let filtered = summer_collection().filter_date(&range);
    let ids: Vec<&str> = filtered.images().iter().map(|i| i.id()).collect();
    assert_eq!(ids, vec!["june"]);
}

#[test]
fn test_filter_bounds_by_point() {
    let collection = summer_collection();
    let inside = collection.filter_bounds(&Geometry::Point(Point::new(-105.6995, 40.0995)));
    assert_eq!(inside.len(), 4);

    let outside = collection.filter_bounds(&Geometry::Point(Point::new(114.0, -26.0)));
    assert!(outside.is_empty());
}

#[test]
fn test_map_is_non_destructive() {
    let collection = summer_collection();
    let masked = collection.map(|image| image.update_mask(&[false])).unwrap();

    assert!(masked.images().iter().all(|i| i.valid_count() == 0));
    assert!(collection.images().iter().all(|i| i.valid_count() == 1));
}
