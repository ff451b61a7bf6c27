//! Quality-assurance flag tables
//!
//! An encoding names the QA band of a product and the bit positions that
//! flag a pixel as unusable. Built-in encodings are parsed from the embedded
//! `qa_encodings.toml` once, on first use.

use std::collections::BTreeMap;
use lazy_static::lazy_static;
use log::warn;
use serde::Deserialize;

use crate::raster::errors::{RasterError, RasterResult};

/// Encoding used when none is configured
pub const DEFAULT_ENCODING: &str = "landsat8_sr_pixel_qa";

/// Landsat 8 SR `pixel_qa` bit positions
pub const WATER_BIT: u8 = 2;
pub const CLOUD_SHADOW_BIT: u8 = 3;
pub const SNOW_BIT: u8 = 4;
pub const CLOUD_BIT: u8 = 5;

lazy_static! {
    static ref QA_ENCODINGS: BTreeMap<String, QaEncoding> = {
        let content = include_str!("../../qa_encodings.toml");
        parse_encodings(content).unwrap_or_else(|e| {
            warn!("Failed to parse built-in QA encodings: {}", e);
            let fallback = QaEncoding::landsat8_sr_pixel_qa();
            BTreeMap::from([(fallback.name.clone(), fallback)])
        })
    };
}

/// One flag bit of a QA band
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QaFlag {
    /// Bit position, 0 = least significant
    pub bit: u8,
    /// Condition the bit flags (e.g. "cloud")
    pub name: String,
}

impl QaFlag {
    pub fn new(bit: u8, name: &str) -> Self {
        QaFlag { bit, name: name.to_string() }
    }

    /// Single-bit mask for this flag
    pub fn mask(&self) -> u64 {
        1u64 << self.bit
    }
}

/// A QA band layout: which band to read and which bits reject a pixel
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QaEncoding {
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Name of the QA band on each image
    pub band: String,
    pub flags: Vec<QaFlag>,
}

impl QaEncoding {
    /// Create a custom encoding
    ///
    /// # Returns
    /// The encoding, or a `ConfigError` when a bit does not fit in 64 bits
    pub fn new(name: &str, band: &str, flags: Vec<QaFlag>) -> RasterResult<Self> {
        let encoding = QaEncoding {
            name: name.to_string(),
            description: String::new(),
            band: band.to_string(),
            flags,
        };
        encoding.validate()?;
        Ok(encoding)
    }

    /// Landsat 8 Collection 1 SR `pixel_qa`: cloud shadow, cloud, water, snow
    pub fn landsat8_sr_pixel_qa() -> Self {
        QaEncoding {
            name: DEFAULT_ENCODING.to_string(),
            description: "Landsat 8 Collection 1 surface reflectance pixel_qa".to_string(),
            band: "pixel_qa".to_string(),
            flags: vec![
                QaFlag::new(CLOUD_SHADOW_BIT, "cloud_shadow"),
                QaFlag::new(CLOUD_BIT, "cloud"),
                QaFlag::new(WATER_BIT, "water"),
                QaFlag::new(SNOW_BIT, "snow"),
            ],
        }
    }

    fn validate(&self) -> RasterResult<()> {
        if let Some(flag) = self.flags.iter().find(|f| f.bit >= 64) {
            return Err(RasterError::ConfigError(format!(
                "QA flag '{}' uses bit {}, only bits 0-63 are supported", flag.name, flag.bit
            )));
        }
        Ok(())
    }
}

/// Parse a table of encodings keyed by name
pub fn parse_encodings(content: &str) -> RasterResult<BTreeMap<String, QaEncoding>> {
    let mut encodings: BTreeMap<String, QaEncoding> = toml::from_str(content)
        .map_err(|e| RasterError::ConfigError(format!("Failed to parse QA encodings: {}", e)))?;

    for (name, encoding) in encodings.iter_mut() {
        encoding.name = name.clone();
        encoding.validate()?;
    }

    Ok(encodings)
}

/// Look up a built-in encoding by name
pub fn get_encoding(name: &str) -> RasterResult<QaEncoding> {
    QA_ENCODINGS.get(name)
        .cloned()
        .ok_or_else(|| RasterError::ConfigError(format!(
            "Unknown QA encoding '{}'. Known encodings: {}", name, encoding_names().join(", ")
        )))
}

/// Names of all built-in encodings
pub fn encoding_names() -> Vec<String> {
    QA_ENCODINGS.keys().cloned().collect()
}
