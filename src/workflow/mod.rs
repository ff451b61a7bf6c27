//! Compositing workflow and its configuration

pub mod config;
pub mod pipeline;

pub use config::{CollectionConfig, IndexConfig, LayerNames, MapConfig, ReductionConfig, RegionConfig, WorkflowConfig};
pub use pipeline::{Workflow, WorkflowReport, AREA_LABEL};
