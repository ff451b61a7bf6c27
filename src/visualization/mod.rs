//! Visualization parameters and output sinks

pub mod color;
pub mod vis_params;
pub mod sink;

pub use color::Color;
pub use vis_params::{GeometryVis, HistogramOptions, VisParams};
pub use sink::{
    zoom_to_fit, ConsoleOutput, Layer, LayerRegistry, LayerSummary, MapLayer, MapSink, MapView,
    OutputSink, RecordingOutput,
};
