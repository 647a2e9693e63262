//! Charts module - Chart specification and rendering

mod plotter;
mod renderer;

pub use plotter::{ChartColor, ChartData, ChartError, ChartKind, ChartPlotter, ChartSink, ChartSpec};
pub use renderer::{file_slug, StaticChartRenderer};
