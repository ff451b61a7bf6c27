//! Region reductions and histograms

pub mod sampling;
pub mod region;
pub mod histogram;

pub use region::{reduce_region, Reducer, ReductionResult};
pub use histogram::{histogram, Histogram, HistogramSeries};
pub use sampling::{band_samples, sample_locations};
