//! Custom error types for raster processing

use std::fmt;
use std::io;

/// Raster processing error types
#[derive(Debug)]
pub enum RasterError {
    /// I/O error
    IoError(io::Error),
    /// Band not present on an image
    BandNotFound(String),
    /// Archive identifier unknown to the catalog
    ArchiveNotFound(String),
    /// Operation needs at least one image
    EmptyCollection,
    /// Images or bands do not share the same pixel grid
    GridMismatch(String),
    /// Reduction would sample more pixels than allowed
    TooManyPixels { required: u64, max: u64 },
    /// Geometry cannot be used for the requested operation
    InvalidGeometry(String),
    /// Configuration or catalog could not be parsed
    ConfigError(String),
    /// Generic error with message
    GenericError(String),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RasterError::IoError(e) => write!(f, "I/O error: {}", e),
            RasterError::BandNotFound(name) => write!(f, "Band not found: {}", name),
            RasterError::ArchiveNotFound(id) => write!(f, "Archive not found: {}", id),
            RasterError::EmptyCollection => write!(f, "Image collection is empty"),
            RasterError::GridMismatch(msg) => write!(f, "Pixel grid mismatch: {}", msg),
            RasterError::TooManyPixels { required, max } => write!(
                f,
                "Too many pixels in the region: {} required, maxPixels is {}",
                required, max
            ),
            RasterError::InvalidGeometry(msg) => write!(f, "Invalid geometry: {}", msg),
            RasterError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            RasterError::GenericError(msg) => write!(f, "Raster error: {}", msg),
        }
    }
}

impl std::error::Error for RasterError {}

impl From<io::Error> for RasterError {
    fn from(error: io::Error) -> Self {
        RasterError::IoError(error)
    }
}

impl From<String> for RasterError {
    fn from(msg: String) -> Self {
        RasterError::GenericError(msg)
    }
}

/// Result type for raster operations
pub type RasterResult<T> = Result<T, RasterError>;
