//! Per-pixel quality mask
//!
//! A pixel is usable when none of the encoding's flag bits are set in its
//! QA code. Masking an image only narrows its validity mask; band values
//! are never changed.

use log::info;

use crate::qa::flags::QaEncoding;
use crate::raster::errors::RasterResult;
use crate::raster::{Band, RasterImage};

/// Quality mask built from a QA encoding
#[derive(Debug, Clone, PartialEq)]
pub struct QualityMask {
    encoding: QaEncoding,
    bitmask: u64,
}

impl QualityMask {
    /// Create a mask for an encoding
    pub fn new(encoding: QaEncoding) -> Self {
        let bitmask = encoding.flags.iter().fold(0u64, |acc, flag| acc | flag.mask());
        QualityMask { encoding, bitmask }
    }

    /// Mask for Landsat 8 Collection 1 SR `pixel_qa`
    pub fn landsat8() -> Self {
        QualityMask::new(QaEncoding::landsat8_sr_pixel_qa())
    }

    pub fn encoding(&self) -> &QaEncoding {
        &self.encoding
    }

    /// Union of all rejecting bits
    pub fn bitmask(&self) -> u64 {
        self.bitmask
    }

    /// `true` iff none of the flag bits are set
    pub fn is_clear(&self, qa: u64) -> bool {
        qa & self.bitmask == 0
    }

    /// Evaluate a raw band sample
    ///
    /// Missing (`NaN`), negative and non-integral samples are not valid QA
    /// codes and count as not clear.
    pub fn is_clear_sample(&self, sample: f64) -> bool {
        sample_to_code(sample).is_some_and(|qa| self.is_clear(qa))
    }

    /// Names of the flags set in a QA code, in table order
    pub fn failing_flags(&self, qa: u64) -> Vec<&str> {
        self.encoding.flags.iter()
            .filter(|flag| qa & flag.mask() != 0)
            .map(|flag| flag.name.as_str())
            .collect()
    }

    /// Human-readable verdict for a QA code
    pub fn explain(&self, qa: u64) -> String {
        let failing = self.failing_flags(qa);
        if failing.is_empty() {
            format!("{} ({:#b}): clear", qa, qa)
        } else {
            format!("{} ({:#b}): masked ({})", qa, qa, failing.join(", "))
        }
    }

    /// Validity of every sample of a QA band
    pub fn validity(&self, qa_band: &Band) -> Vec<bool> {
        qa_band.values.iter()
            .map(|sample| self.is_clear_sample(*sample))
            .collect()
    }

    /// Mask the pixels of an image whose QA code has a flag set
    ///
    /// # Returns
    /// A new image with the narrowed mask, or `BandNotFound` if the image
    /// lacks the encoding's QA band
    pub fn apply(&self, image: &RasterImage) -> RasterResult<RasterImage> {
        let qa_band = image.band(&self.encoding.band)?;
        let validity = self.validity(qa_band);
        let masked = image.update_mask(&validity)?;

        info!("QA mask '{}' on {}: {} of {} pixels clear",
              self.encoding.name, image.id(), masked.valid_count(), masked.pixel_count());
        Ok(masked)
    }
}

/// Convert a band sample to an integer QA code
fn sample_to_code(sample: f64) -> Option<u64> {
    if !sample.is_finite() || sample < 0.0 || sample.fract() != 0.0 || sample > u64::MAX as f64 {
        return None;
    }
    Some(sample as u64)
}
