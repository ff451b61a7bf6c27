//! Integration tests for the compositing workflow

use std::fs;
use std::path::PathBuf;

use compkit::compositing::median_of;
use compkit::qa::QualityMask;
use compkit::workflow::AREA_LABEL;
use compkit::{
    Band, Catalog, CompKit, ImageCollection, ImageryService, LocalImageryService, RasterError,
    RasterImage, WorkflowConfig,
};

const QA_BITMASK: u64 = 0b0011_1100;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn demo_catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("demos").join("sample_catalog.json")
}

fn scene(id: &str, values: Vec<f64>, qa: Vec<f64>) -> RasterImage {
    RasterImage::new(
        id,
        2,
        2,
        [-105.70, 0.1, 0.0, 40.10, 0.0, -0.1],
        vec![Band::new("B1", values), Band::new("pixel_qa", qa)],
    )
    .unwrap()
}

#[test]
fn test_masked_median_excludes_flagged_pixels() {
    init_logging();

    // Codes per scene and pixel; 4, 8, 16, 32 and 60 carry a rejecting flag
    let scenes = vec![
        (vec![10.0, 20.0, 30.0, 40.0], vec![322.0, 4.0, 66.0, 8.0]),
        (vec![11.0, 21.0, 31.0, 41.0], vec![16.0, 322.0, 32.0, 0.0]),
        (vec![12.0, 22.0, 32.0, 42.0], vec![1.0, 1024.0, 60.0, 2.0]),
    ];
    let collection: ImageCollection = scenes.iter()
        .enumerate()
        .map(|(i, (values, qa))| scene(&format!("scene_{}", i), values.clone(), qa.clone()))
        .collect();

    let service = LocalImageryService::new(Catalog::new());
    let mask = QualityMask::landsat8();
    let masked = service.map_over_collection(&collection, &|image: &RasterImage| mask.apply(image)).unwrap();
    let composite = service.median(&masked).unwrap();
    let band = composite.band("B1").unwrap();

    assert_eq!(band.values, vec![11.0, 21.5, 30.0, 41.5]);

    for pixel in 0..4 {
        let mut kept: Vec<f64> = scenes.iter()
            .filter(|(_, qa)| (qa[pixel] as u64) & QA_BITMASK == 0)
            .map(|(values, _)| values[pixel])
            .collect();
        assert_eq!(Some(band.values[pixel]), median_of(&mut kept), "pixel {}", pixel);
        assert!(composite.is_valid(pixel));
    }

    // Without masking every scene contributes
    let unmasked = service.median(&collection).unwrap();
    assert_eq!(unmasked.band("B1").unwrap().values, vec![11.0, 21.0, 31.0, 41.0]);
}

#[test]
fn test_pixel_masked_in_every_scene_is_invalid() {
    let collection = ImageCollection::new(vec![
        scene("a", vec![1.0, 2.0, 3.0, 4.0], vec![322.0, 32.0, 322.0, 322.0]),
        scene("b", vec![5.0, 6.0, 7.0, 8.0], vec![322.0, 8.0, 322.0, 322.0]),
    ]);
    let mask = QualityMask::landsat8();
    let masked = collection.map(|image| mask.apply(image)).unwrap();
    let composite = compkit::compositing::median(&masked).unwrap();

    assert!(!composite.is_valid(1));
    assert!(composite.band("B1").unwrap().values[1].is_nan());
    assert_eq!(composite.band("B1").unwrap().values[0], 3.0);
}

#[test]
fn test_workflow_over_demo_catalog() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let log_file = dir.path().join("compkit.log");
    let kit = CompKit::new(log_file.to_str()).unwrap();

    let catalog = kit.load_catalog(demo_catalog_path()).unwrap();
    let config = WorkflowConfig::default();
    let outcome = kit.run(catalog, &config).unwrap();
    let report = &outcome.report;

    // The October scene falls outside the date range
    assert_eq!(report.scene_count, 3);

    assert_eq!(
        outcome.map.layer_names(),
        vec!["SRmasked", "SR_unmasked", "median", "NDVI SR_product", "poly1"]
    );
    let view = outcome.map.view().unwrap();
    assert!((view.center.x - -105.6185272).abs() < 1e-9);
    assert!((view.center.y - 40.0693832).abs() < 1e-9);

    let masked_b5 = &report.masked_composite.band("B5").unwrap().values;
    assert_eq!(masked_b5[0], 3500.0);
    assert_eq!(masked_b5[2], 2700.0);
    assert_eq!(masked_b5[3], 2500.0);
    assert_eq!(report.unmasked_composite.band("B5").unwrap().values[0], 3000.0);

    assert_eq!(report.index.band_names(), vec!["NDVI"]);
    let ndvi = report.region_statistics.get("NDVI").unwrap();
    assert!((ndvi - 2500.0 / 4500.0).abs() < 1e-12);

    let expected_area = std::f64::consts::PI * 700.0 * 700.0 / 1e6;
    assert!((report.area_km2 - expected_area).abs() < 1e-9);

    // One constant value in the region: a single bucket holding every sample
    let samples = report.region_statistics.sample_counts["NDVI"] as u64;
    assert!(samples > 0);
    assert_eq!(report.histogram.bucket_count(), 1);
    assert_eq!(report.histogram.series[0].total(), samples);

    assert_eq!(outcome.printed.len(), 3);
    assert!(outcome.printed[0].starts_with("{\"NDVI\":0.5555"));
    assert!(outcome.printed[1].starts_with(AREA_LABEL));
    assert!(outcome.printed[2].contains("Histogram of NDVI values in polygon"));

    let log = fs::read_to_string(&log_file).unwrap();
    assert!(log.contains("Workflow output:"));
}

#[test]
fn test_workflow_from_files() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("catalog.json");
    let config_path = dir.path().join("workflow.toml");

    fs::write(&catalog_path, r#"{ "archives": { "LANDSAT/LC09/C02/T1_L2": [
        { "id": "a", "date": "2022-07-01", "width": 2, "height": 1,
          "geotransform": [10.0, 0.01, 0.0, 50.01, 0.0, -0.01],
          "bands": { "SR_B5": [0.6, 0.5], "SR_B4": [0.2, 0.3], "QA_PIXEL": [21824, 21824] } },
        { "id": "b", "date": "2022-07-17", "width": 2, "height": 1,
          "geotransform": [10.0, 0.01, 0.0, 50.01, 0.0, -0.01],
          "bands": { "SR_B5": [0.1, 0.5], "SR_B4": [0.9, 0.3], "QA_PIXEL": [22280, 21824] } }
    ] } }"#).unwrap();

    fs::write(&config_path, r#"
        [collection]
        archive = "LANDSAT/LC09/C02/T1_L2"
        point = [10.005, 50.005]
        start = "2022-07-01"
        end = "2022-08-01"
        qa_encoding = "landsat_c2_qa_pixel"

        [composite_vis]
        bands = ["SR_B4", "SR_B5", "SR_B4"]
        max = 1.0

        [median_vis]
        bands = ["SR_B4", "SR_B5", "SR_B4"]

        [index]
        band_a = "SR_B5"
        band_b = "SR_B4"

        [region]
        polygon = [[10.001, 50.001], [10.009, 50.001], [10.009, 50.009], [10.001, 50.009]]

        [reduction]
        scale = 100.0
    "#).unwrap();

    let kit = CompKit::new(dir.path().join("compkit.log").to_str()).unwrap();
    let catalog = kit.load_catalog(&catalog_path).unwrap();
    let config = WorkflowConfig::from_file(&config_path).unwrap();
    let outcome = kit.run(catalog, &config).unwrap();

    // Scene b has the cloud bit (3) set at the first pixel, so only scene a counts
    let ndvi = outcome.report.region_statistics.get("NDVI").unwrap();
    assert!((ndvi - 0.5).abs() < 1e-12);
    assert_eq!(outcome.map.layer_names()[4], "poly1");
    assert!(outcome.report.area_km2 > 0.4 && outcome.report.area_km2 < 0.6);
}

#[test]
fn test_workflow_errors() {
    init_logging();
    let dir = tempfile::tempdir().unwrap();
    let kit = CompKit::new(dir.path().join("compkit.log").to_str()).unwrap();

    let mut config = WorkflowConfig::default();
    config.reduction.max_pixels = 10;
    let catalog = kit.load_catalog(demo_catalog_path()).unwrap();
    assert!(matches!(
        kit.run(catalog, &config),
        Err(RasterError::TooManyPixels { max: 10, .. })
    ));

    let mut config = WorkflowConfig::default();
    config.collection.start = "2015-01-01".to_string();
    config.collection.end = "2015-02-01".to_string();
    let catalog = kit.load_catalog(demo_catalog_path()).unwrap();
    assert!(matches!(kit.run(catalog, &config), Err(RasterError::EmptyCollection)));

    let mut config = WorkflowConfig::default();
    config.collection.archive = "MODIS/006/MOD09GA".to_string();
    let catalog = kit.load_catalog(demo_catalog_path()).unwrap();
    assert!(matches!(kit.run(catalog, &config), Err(RasterError::ArchiveNotFound(_))));

    let bad_catalog = dir.path().join("bad.json");
    fs::write(&bad_catalog, "{ \"archives\": 3 }").unwrap();
    assert!(matches!(kit.load_catalog(&bad_catalog), Err(RasterError::ConfigError(_))));
    assert!(matches!(kit.load_catalog(dir.path().join("missing.json")), Err(RasterError::IoError(_))));
}

#[test]
fn test_explain_and_inspect() {
    let dir = tempfile::tempdir().unwrap();
    let kit = CompKit::new(dir.path().join("compkit.log").to_str()).unwrap();

    let lines = kit.explain_qa(&[322, 40], "landsat8_sr_pixel_qa").unwrap();
    assert_eq!(lines[0], "322 (0b101000010): clear");
    assert_eq!(lines[1], "40 (0b101000): masked (cloud_shadow, cloud)");
    assert!(kit.explain_qa(&[0], "sentinel2").is_err());

    let described = kit.inspect(demo_catalog_path()).unwrap();
    assert!(described.iter().any(|line| line.contains("LANDSAT/LC08/C01/T1_SR")));
    assert!(described.iter().any(|line| line.contains("LC08_034032_20160712")));
}
