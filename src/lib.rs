//! chart-pages: headless data-visualization pages rendered to SVG.
//!
//! Every page follows the same pipeline: fetch a dataset, derive scales,
//! map records to visual elements, then attach tooltip, highlight and legend
//! behavior. Pages implement [`api::ChartPage`] and are driven by
//! [`api::ChartOrchestrator`].

pub mod api;
pub mod core;
pub mod data;
pub mod error;
pub mod interaction;
pub mod render;
pub mod telemetry;

pub use api::{
    BarChartPage, ChartContext, ChartOrchestrator, ChartPage, ChoroplethPage, HeatMapPage,
    LegendPlacement, ScatterplotPage, TreemapDataset, TreemapPage, UiState,
};
pub use error::{ChartError, ChartResult};
