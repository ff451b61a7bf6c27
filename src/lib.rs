pub mod raster;
pub mod qa;
pub mod coordinate;
pub mod compositing;
pub mod index;
pub mod reduce;
pub mod visualization;
pub mod service;
pub mod workflow;
pub mod utils;
pub mod commands;
pub mod api;

pub use crate::api::CompKit;

pub use raster::{Band, ImageCollection, RasterError, RasterImage, RasterResult};
pub use coordinate::{BoundingBox, Geometry, Point, CoordinateTransformer};
pub use qa::QualityMask;
pub use service::{Catalog, ImageryService, LocalImageryService};
pub use workflow::{Workflow, WorkflowConfig, WorkflowReport};
