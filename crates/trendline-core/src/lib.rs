// File: crates/trendline-core/src/lib.rs
// Summary: Trendline fitting and rendering for Skia charts; public API re-exports.

pub mod error;
pub mod color;
pub mod config;
pub mod fit;
pub mod dataset;
pub mod axis;
pub mod scale;
pub mod geometry;
pub mod sample;
pub mod frame;
pub mod text;
pub mod path;
pub mod label;
pub mod plugin;
pub mod types;
pub mod chart;

pub use error::TrendlineError;
pub use color::CssColor;
pub use config::{
    AggregateGroup, FillColor, LabelSpec, LabelText, LineStyle, TrendlineKind, TrendlinePluginOptions,
    TrendlineSpec,
};
pub use fit::{create_fitter, FitStatistics, Fitter};
pub use dataset::{CategoryLabel, Dataset, Datum};
pub use axis::Axis;
pub use scale::{AxisScale, ValueScale};
pub use geometry::{ChartArea, LabelRect};
pub use frame::Frame;
pub use text::{TextRenderer, TextShaper};
pub use label::{LabelDraw, LabelPlacer, TrendlineOrigin};
pub use plugin::{PassReport, SkippedTrendline, TrendlinePlugin};
pub use chart::{Chart, RenderOptions};
