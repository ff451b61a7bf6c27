//! Scene catalog backing the local imagery service
//!
//! A catalog maps archive identifiers to the scenes they hold. It is read
//! from a JSON document:
//!
//! ```json
//! { "archives": { "LANDSAT/LC08/C01/T1_SR": [
//!     { "id": "LC08_034032_20160610", "date": "2016-06-10",
//!       "width": 2, "height": 2,
//!       "geotransform": [-105.70, 0.001, 0.0, 40.10, 0.0, -0.001],
//!       "bands": { "B4": [1, 2, 3, null], "pixel_qa": [322, 328, 322, 322] } }
//! ] } }
//! ```
//!
//! `null` samples carry no data and become `NaN`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Deserialize;

use crate::raster::errors::{RasterError, RasterResult};
use crate::raster::{parse_date, Band, GeoTransform, ImageCollection, RasterImage};

#[derive(Debug, Deserialize)]
struct CatalogFile {
    archives: BTreeMap<String, Vec<SceneRecord>>,
}

#[derive(Debug, Deserialize)]
struct SceneRecord {
    id: String,
    date: Option<String>,
    width: usize,
    height: usize,
    geotransform: GeoTransform,
    bands: BTreeMap<String, Vec<Option<f64>>>,
}

impl SceneRecord {
    fn into_image(self) -> RasterResult<RasterImage> {
        let bands = self.bands.into_iter()
            .map(|(name, samples)| {
                Band::new(&name, samples.into_iter().map(|s| s.unwrap_or(f64::NAN)).collect())
            })
            .collect();

        let image = RasterImage::new(&self.id, self.width, self.height, self.geotransform, bands)
            .map_err(|e| RasterError::ConfigError(format!("Scene '{}': {}", self.id, e)))?;

        match self.date {
            Some(date) => Ok(image.with_date(parse_date(&date)?)),
            None => Ok(image),
        }
    }
}

/// In-memory scene archives
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    archives: BTreeMap<String, ImageCollection>,
}

impl Catalog {
    pub fn new() -> Self {
        Catalog::default()
    }

    /// Parse a catalog from JSON text
    pub fn from_json(content: &str) -> RasterResult<Self> {
        let file: CatalogFile = serde_json::from_str(content)
            .map_err(|e| RasterError::ConfigError(format!("Failed to parse catalog: {}", e)))?;

        let mut catalog = Catalog::new();
        for (archive, records) in file.archives {
            let images = records.into_iter()
                .map(SceneRecord::into_image)
                .collect::<RasterResult<Vec<RasterImage>>>()?;
            debug!("Archive '{}': {} scenes", archive, images.len());
            catalog.archives.insert(archive, ImageCollection::new(images));
        }
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> RasterResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let catalog = Catalog::from_json(&content)?;
        info!("Loaded catalog {} with {} archives", path.display(), catalog.archives.len());
        Ok(catalog)
    }

    /// Add scenes to an archive, creating it if needed
    pub fn insert(&mut self, archive: &str, images: Vec<RasterImage>) {
        let mut all = self.archives.remove(archive)
            .map(|c| c.images().to_vec())
            .unwrap_or_default();
        all.extend(images);
        self.archives.insert(archive.to_string(), ImageCollection::new(all));
    }

    /// All scenes of an archive
    pub fn archive(&self, archive: &str) -> RasterResult<&ImageCollection> {
        self.archives.get(archive)
            .ok_or_else(|| RasterError::ArchiveNotFound(archive.to_string()))
    }

    pub fn archive_ids(&self) -> Vec<&str> {
        self.archives.keys().map(String::as_str).collect()
    }

    /// One line per archive and per scene
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for (archive, collection) in &self.archives {
            lines.push(format!("{} ({} scenes)", archive, collection.len()));
            for image in collection.images() {
                let date = image.date()
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "undated".to_string());
                let footprint = image.footprint();
                lines.push(format!(
                    "  {} {} {}x{} bands [{}] extent ({:.4}, {:.4}, {:.4}, {:.4})",
                    image.id(), date, image.width(), image.height(), image.band_names().join(", "),
                    footprint.min_x, footprint.min_y, footprint.max_x, footprint.max_y
                ));
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"{
        "archives": {
            "LANDSAT/LC08/C01/T1_SR": [
                { "id": "a", "date": "2016-06-10", "width": 2, "height": 1,
                  "geotransform": [-105.70, 0.001, 0.0, 40.10, 0.0, -0.001],
                  "bands": { "B4": [1.0, null], "pixel_qa": [322, 328] } }
            ]
        }
    }"#;

    #[test]
    fn test_parse_catalog() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.archive_ids(), vec!["LANDSAT/LC08/C01/T1_SR"]);

        let scenes = catalog.archive("LANDSAT/LC08/C01/T1_SR").unwrap();
        let scene = &scenes.images()[0];
        assert_eq!(scene.date(), Some(parse_date("2016-06-10").unwrap()));
        assert!(scene.band("B4").unwrap().values[1].is_nan());
        assert_eq!(scene.band("pixel_qa").unwrap().values, vec![322.0, 328.0]);

        assert!(matches!(catalog.archive("COPERNICUS/S2"), Err(RasterError::ArchiveNotFound(_))));
    }

    #[test]
    fn test_rejects_bad_scenes() {
        let short_band = CATALOG.replace("[1.0, null]", "[1.0]");
        assert!(matches!(Catalog::from_json(&short_band), Err(RasterError::ConfigError(_))));

        let oversized = CATALOG.replace(r#""width": 2, "height": 1"#, r#""width": 4294967296, "height": 4294967296"#);
        assert!(matches!(Catalog::from_json(&oversized), Err(RasterError::ConfigError(_))));

        let flat_pixels = CATALOG.replace("0.0, -0.001]", "0.0, 0.0]");
        assert!(matches!(Catalog::from_json(&flat_pixels), Err(RasterError::ConfigError(_))));

        let bad_date = CATALOG.replace("2016-06-10", "June");
        assert!(Catalog::from_json(&bad_date).is_err());
        assert!(Catalog::from_json("{").is_err());
    }

    #[test]
    fn test_describe() {
        let lines = Catalog::from_json(CATALOG).unwrap().describe();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "LANDSAT/LC08/C01/T1_SR (1 scenes)");
        assert!(lines[1].starts_with("  a 2016-06-10 2x1 bands [B4, pixel_qa]"));
    }

    #[test]
    fn test_insert_appends() {
        let mut catalog = Catalog::from_json(CATALOG).unwrap();
        let extra = catalog.archive("LANDSAT/LC08/C01/T1_SR").unwrap().images().to_vec();
        catalog.insert("LANDSAT/LC08/C01/T1_SR", extra);
        assert_eq!(catalog.archive("LANDSAT/LC08/C01/T1_SR").unwrap().len(), 2);
    }
}
