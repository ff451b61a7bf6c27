//! Region reductions
//!
//! Aggregates every band of an image over a geometry into one statistic
//! per band.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use log::info;

use crate::compositing::median_of;
use crate::coordinate::Geometry;
use crate::raster::errors::{RasterError, RasterResult};
use crate::raster::RasterImage;
use crate::reduce::sampling::{band_samples, sample_locations};

/// Statistic computed by a region reduction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    Mean,
    Median,
    Min,
    Max,
    Sum,
    Count,
}

impl Reducer {
    /// Reduce a set of finite samples, `None` when there are none
    ///
    /// `Count` and `Sum` of an empty set are zero.
    pub fn apply(&self, samples: &mut [f64]) -> Option<f64> {
        match self {
            Reducer::Count => Some(samples.len() as f64),
            Reducer::Sum => Some(samples.iter().sum()),
            _ if samples.is_empty() => None,
            Reducer::Mean => Some(samples.iter().sum::<f64>() / samples.len() as f64),
            Reducer::Median => median_of(samples),
            Reducer::Min => samples.iter().copied().reduce(f64::min),
            Reducer::Max => samples.iter().copied().reduce(f64::max),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Reducer::Mean => "mean",
            Reducer::Median => "median",
            Reducer::Min => "min",
            Reducer::Max => "max",
            Reducer::Sum => "sum",
            Reducer::Count => "count",
        }
    }
}

impl FromStr for Reducer {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mean" => Ok(Reducer::Mean),
            "median" => Ok(Reducer::Median),
            "min" => Ok(Reducer::Min),
            "max" => Ok(Reducer::Max),
            "sum" => Ok(Reducer::Sum),
            "count" => Ok(Reducer::Count),
            other => Err(RasterError::ConfigError(format!("Unknown reducer '{}'", other))),
        }
    }
}

/// Per-band statistic of a region reduction
#[derive(Debug, Clone, PartialEq)]
pub struct ReductionResult {
    pub reducer: Reducer,
    /// Band name to statistic; `None` when no valid pixel was sampled
    pub values: BTreeMap<String, Option<f64>>,
    /// Number of valid samples per band
    pub sample_counts: BTreeMap<String, usize>,
}

impl ReductionResult {
    /// Statistic of one band, `None` if absent or undefined
    pub fn get(&self, band: &str) -> Option<f64> {
        self.values.get(band).copied().flatten()
    }
}

impl fmt::Display for ReductionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string(&self.values).map_err(|_| fmt::Error)?;
        write!(f, "{}", json)
    }
}

/// Reduce every band of an image over a region
///
/// # Arguments
/// * `image` - Image to reduce
/// * `reducer` - Statistic to compute
/// * `geometry` - Region to reduce over
/// * `scale` - Sampling resolution in meters
/// * `max_pixels` - Largest sampling grid allowed
pub fn reduce_region(
    image: &RasterImage,
    reducer: Reducer,
    geometry: &Geometry,
    scale: f64,
    max_pixels: u64,
) -> RasterResult<ReductionResult> {
    let locations = sample_locations(geometry, scale, max_pixels)?;

    let mut values = BTreeMap::new();
    let mut sample_counts = BTreeMap::new();
    for name in image.band_names() {
        let mut samples = band_samples(image, name, &locations)?;
        sample_counts.insert(name.to_string(), samples.len());
        values.insert(name.to_string(), reducer.apply(&mut samples));
    }

    let result = ReductionResult { reducer, values, sample_counts };
    info!("reduce_region({}) over {} at {} m: {}", reducer.name(), geometry, scale, result);
    Ok(result)
}
