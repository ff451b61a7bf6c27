//! Named raster bands

/// A single named band of `f64` samples in row-major order
///
/// `NaN` marks a sample with no data.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    /// Band name (e.g. "B4", "pixel_qa")
    pub name: String,
    /// Samples, `width * height` long
    pub values: Vec<f64>,
}

impl Band {
    /// Create a new band
    pub fn new(name: &str, values: Vec<f64>) -> Self {
        Band {
            name: name.to_string(),
            values,
        }
    }

    /// Same samples under a different name
    pub fn renamed(&self, name: &str) -> Self {
        Band::new(name, self.values.clone())
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check whether the band holds no samples
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
