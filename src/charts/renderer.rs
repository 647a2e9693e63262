//! Static Chart Renderer
//! Draws chart specifications to PNG files with plotters and opens them in
//! the system image viewer.
//!
//! Files land in a fixed directory as `NN_<title>.png`, numbered in render order.

use crate::charts::{ChartColor, ChartData, ChartError, ChartKind, ChartSink, ChartSpec};
use plotters::prelude::*;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const CAPTION_FONT: (&str, u32) = ("sans-serif", 28);
const MARKER_SIZE: u32 = 4;

fn backend_err<E: std::fmt::Display>(err: E) -> ChartError {
    ChartError::Backend(err.to_string())
}

/// Lowercase title with runs of non-alphanumerics collapsed to `_`.
pub fn file_slug(title: &str) -> String {
    title
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| part.to_ascii_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Padded axis range covering `values`.
fn padded_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });

    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * 0.05;
    (min - pad)..(max + pad)
}

/// Renders charts to PNG and displays them.
pub struct StaticChartRenderer {
    output_dir: PathBuf,
    size: (u32, u32),
    open_viewer: bool,
    rendered: usize,
}

impl StaticChartRenderer {
    pub fn new(output_dir: impl Into<PathBuf>, size: (u32, u32)) -> Self {
        Self {
            output_dir: output_dir.into(),
            size,
            open_viewer: true,
            rendered: 0,
        }
    }

    /// Only write the PNG files, do not launch a viewer.
    pub fn without_viewer(mut self) -> Self {
        self.open_viewer = false;
        self
    }

    /// Path for the next chart.
    pub fn chart_path(&self, spec: &ChartSpec) -> PathBuf {
        self.output_dir
            .join(format!("{:02}_{}.png", self.rendered + 1, file_slug(&spec.title)))
    }

    fn draw(&self, path: &Path, spec: &ChartSpec) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, self.size).into_drawing_area();
        root.fill(&WHITE).map_err(backend_err)?;

        let color: RGBColor = spec.color.into();

        match &spec.data {
            ChartData::Points(points) => {
                let x_range = padded_range(points.iter().map(|p| p.0));
                let y_range = padded_range(points.iter().map(|p| p.1));

                let mut chart = ChartBuilder::on(&root)
                    .caption(&spec.title, CAPTION_FONT)
                    .margin(15)
                    .x_label_area_size(45)
                    .y_label_area_size(60)
                    .build_cartesian_2d(x_range, y_range)
                    .map_err(backend_err)?;

                let mut mesh = chart.configure_mesh();
                mesh.x_desc(spec.x_label.as_str())
                    .y_desc(spec.y_label.as_str());
                if !spec.grid {
                    mesh.disable_mesh();
                }
                mesh.draw().map_err(backend_err)?;

                if spec.kind == ChartKind::Line {
                    chart
                        .draw_series(LineSeries::new(points.iter().copied(), &color))
                        .map_err(backend_err)?;
                }
                if spec.marker || spec.kind == ChartKind::Scatter {
                    chart
                        .draw_series(
                            points
                                .iter()
                                .map(|&(x, y)| Circle::new((x, y), MARKER_SIZE, color.filled())),
                        )
                        .map_err(backend_err)?;
                }
            }
            ChartData::Categories(bars) => {
                let n = bars.len().max(1) as i32;
                let top = bars.iter().map(|b| b.1).fold(0.0_f64, f64::max);
                let top = if top > 0.0 { top * 1.1 } else { 1.0 };
                let names: Vec<&str> = bars.iter().map(|b| b.0.as_str()).collect();
                let label_for = |v: &SegmentValue<i32>| match v {
                    SegmentValue::CenterOf(i) => names
                        .get(*i as usize)
                        .map(|s| s.to_string())
                        .unwrap_or_default(),
                    _ => String::new(),
                };

                let mut chart = ChartBuilder::on(&root)
                    .caption(&spec.title, CAPTION_FONT)
                    .margin(15)
                    .x_label_area_size(45)
                    .y_label_area_size(70)
                    .build_cartesian_2d((0..n).into_segmented(), 0f64..top)
                    .map_err(backend_err)?;

                let mut mesh = chart.configure_mesh();
                mesh.x_desc(spec.x_label.as_str())
                    .y_desc(spec.y_label.as_str())
                    .x_labels(bars.len().max(1))
                    .x_label_formatter(&label_for);
                if !spec.grid {
                    mesh.disable_mesh();
                }
                mesh.draw().map_err(backend_err)?;

                chart
                    .draw_series(
                        Histogram::vertical(&chart)
                            .style(color.filled())
                            .margin(40)
                            .data(bars.iter().enumerate().map(|(i, b)| (i as i32, b.1))),
                    )
                    .map_err(backend_err)?;
            }
        }

        root.present().map_err(backend_err)?;
        Ok(())
    }
}

impl ChartSink for StaticChartRenderer {
    fn render(&mut self, spec: &ChartSpec) -> Result<(), ChartError> {
        fs::create_dir_all(&self.output_dir)?;
        let path = self.chart_path(spec);
        debug!(path = %path.display(), kind = ?spec.kind, "drawing chart");

        self.draw(&path, spec)?;
        self.rendered += 1;
        info!(path = %path.display(), "chart written");

        if self.open_viewer {
            open::that(&path).map_err(|source| ChartError::Display {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl From<ChartColor> for RGBColor {
    fn from(color: ChartColor) -> Self {
        let (r, g, b) = color.rgb();
        RGBColor(r, g, b)
    }
}
