//! Histogram binning of band values over a region

use std::fmt;
use log::info;

use crate::coordinate::Geometry;
use crate::raster::errors::{RasterError, RasterResult};
use crate::raster::RasterImage;
use crate::reduce::sampling::{band_samples, sample_locations};
use crate::visualization::HistogramOptions;

/// Width of the text bars when printing
const BAR_WIDTH: usize = 40;

/// Counts of one band
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    pub band: String,
    pub counts: Vec<u64>,
}

impl HistogramSeries {
    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

/// Binned frequency distribution of band values in a region
///
/// All series share the same buckets. Bucket `i` covers
/// `[bucket_min + i * bucket_width, bucket_min + (i + 1) * bucket_width)`,
/// the last bucket also includes its upper edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bucket_min: f64,
    pub bucket_width: f64,
    pub series: Vec<HistogramSeries>,
    pub options: HistogramOptions,
}

impl Histogram {
    pub fn bucket_count(&self) -> usize {
        self.series.first().map(|s| s.counts.len()).unwrap_or(0)
    }

    /// Lower edge of bucket `i`
    pub fn bucket_start(&self, i: usize) -> f64 {
        self.bucket_min + i as f64 * self.bucket_width
    }
}

/// Place values into at most `max_buckets` equal-width buckets
///
/// Returns `(bucket_min, bucket_width, counts)` per series. No samples
/// gives zero buckets; identical samples give one bucket of width zero.
fn bin_series(series: &[Vec<f64>], max_buckets: usize) -> (f64, f64, Vec<Vec<u64>>) {
    let all = series.iter().flatten().copied();
    let (min, max) = all.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if min > max {
        return (0.0, 0.0, series.iter().map(|_| Vec::new()).collect());
    }
    if min == max {
        return (min, 0.0, series.iter().map(|s| vec![s.len() as u64]).collect());
    }

    let buckets = max_buckets.max(1);
    let width = (max - min) / buckets as f64;
    let counts = series.iter()
        .map(|samples| {
            let mut counts = vec![0u64; buckets];
            for value in samples {
                let index = (((value - min) / width).floor() as usize).min(buckets - 1);
                counts[index] += 1;
            }
            counts
        })
        .collect();

    (min, width, counts)
}

/// Build a histogram of every band of an image over a region
///
/// # Arguments
/// * `image` - Image whose bands become series
/// * `geometry` - Region to sample
/// * `scale` - Sampling resolution in meters
/// * `max_pixels` - Largest sampling grid allowed
/// * `options` - Binning limit and display configuration
pub fn histogram(
    image: &RasterImage,
    geometry: &Geometry,
    scale: f64,
    max_pixels: u64,
    options: &HistogramOptions,
) -> RasterResult<Histogram> {
    if options.max_buckets == 0 {
        return Err(RasterError::ConfigError("Histogram needs at least one bucket".to_string()));
    }

    let locations = sample_locations(geometry, scale, max_pixels)?;
    let band_names = image.band_names();
    let samples = band_names.iter()
        .map(|name| band_samples(image, name, &locations))
        .collect::<RasterResult<Vec<Vec<f64>>>>()?;

    let (bucket_min, bucket_width, counts) = bin_series(&samples, options.max_buckets);
    let series = band_names.iter()
        .zip(counts)
        .map(|(band, counts)| HistogramSeries { band: band.to_string(), counts })
        .collect();

    let histogram = Histogram { bucket_min, bucket_width, series, options: options.clone() };
    info!("Histogram over {} at {} m: {} buckets of width {}",
          geometry, scale, histogram.bucket_count(), bucket_width);
    Ok(histogram)
}

impl fmt::Display for Histogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.options.title)?;
        for (s, series) in self.series.iter().enumerate() {
            let name = self.options.series_name(s, &series.band);
            match self.options.series_color(s) {
                Some(color) => writeln!(f, "Series '{}' ({})", name, color)?,
                None => writeln!(f, "Series '{}'", name)?,
            }
            writeln!(f, "  {:>21} | {}", self.options.h_axis_title, self.options.v_axis_title)?;

            let peak = series.counts.iter().copied().max().unwrap_or(0).max(1);
            for (i, count) in series.counts.iter().enumerate() {
                let bar = "#".repeat((*count as usize * BAR_WIDTH) / peak as usize);
                writeln!(f, "  [{:>9.4}, {:>9.4}) | {:>6} {}",
                         self.bucket_start(i), self.bucket_start(i + 1), count, bar)?;
            }
        }
        Ok(())
    }
}
