//! Chart Plotter Module
//! Builds chart specifications from the sales table and hands them to a sink.

use crate::config::{MARKETING_SPEND_COL, UNITS_SOLD_COL, WEEK_COL};
use crate::data::DataProcessor;
use crate::stats::GroupValue;
use polars::prelude::*;
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Chart backend failed: {0}")]
    Backend(String),
    #[error("Failed to create chart directory: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to display {}: {source}", path.display())]
    Display {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
    Scatter,
}

/// Series colors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartColor {
    Blue,
    Orange,
    Green,
}

impl ChartColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            ChartColor::Blue => (31, 119, 180),
            ChartColor::Orange => (255, 165, 0),
            ChartColor::Green => (0, 128, 0),
        }
    }
}

/// Data behind one chart: numeric points or labelled bars.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Points(Vec<(f64, f64)>),
    Categories(Vec<(String, f64)>),
}

impl ChartData {
    pub fn len(&self) -> usize {
        match self {
            ChartData::Points(points) => points.len(),
            ChartData::Categories(bars) => bars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Everything a backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub color: ChartColor,
    /// Draw a marker at every point (line charts)
    pub marker: bool,
    pub grid: bool,
    pub data: ChartData,
}

/// A display surface that accepts chart specifications.
pub trait ChartSink {
    fn render(&mut self, spec: &ChartSpec) -> Result<(), ChartError>;
}

/// Creates the three sales charts.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Units sold per week (line), revenue per product (bar), and marketing
    /// spend against units sold (scatter), in that order.
    pub fn build_charts(
        df: &DataFrame,
        total_revenue: &[GroupValue],
    ) -> Result<Vec<ChartSpec>, ChartError> {
        let weeks = DataProcessor::numeric_values(df, WEEK_COL)?;
        let units = DataProcessor::numeric_values(df, UNITS_SOLD_COL)?;
        let spend = DataProcessor::numeric_values(df, MARKETING_SPEND_COL)?;

        let units_over_time = ChartSpec {
            kind: ChartKind::Line,
            title: "Units Sold Over Weeks".to_string(),
            x_label: "Week".to_string(),
            y_label: "Units Sold".to_string(),
            color: ChartColor::Blue,
            marker: true,
            grid: true,
            data: ChartData::Points(weeks.into_iter().zip(units.iter().copied()).collect()),
        };

        let revenue_by_product = ChartSpec {
            kind: ChartKind::Bar,
            title: "Total Revenue by Product".to_string(),
            x_label: "Product".to_string(),
            y_label: "Revenue".to_string(),
            color: ChartColor::Orange,
            marker: false,
            grid: true,
            data: ChartData::Categories(
                total_revenue
                    .iter()
                    .map(|g| (g.group.clone(), g.value))
                    .collect(),
            ),
        };

        let spend_vs_units = ChartSpec {
            kind: ChartKind::Scatter,
            title: "Marketing Spend vs Units Sold".to_string(),
            x_label: "Marketing Spend".to_string(),
            y_label: "Units Sold".to_string(),
            color: ChartColor::Green,
            marker: false,
            grid: true,
            data: ChartData::Points(spend.into_iter().zip(units).collect()),
        };

        Ok(vec![units_over_time, revenue_by_product, spend_vs_units])
    }

    /// Render charts in order. The first failure stops rendering.
    pub fn render_all<S: ChartSink + ?Sized>(
        sink: &mut S,
        specs: &[ChartSpec],
    ) -> Result<(), ChartError> {
        for spec in specs {
            sink.render(spec)?;
            info!(title = %spec.title, points = spec.data.len(), "rendered chart");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        rendered: Vec<ChartSpec>,
        fail_on: Option<usize>,
    }

    impl ChartSink for RecordingSink {
        fn render(&mut self, spec: &ChartSpec) -> Result<(), ChartError> {
            if self.fail_on == Some(self.rendered.len()) {
                return Err(ChartError::Backend("boom".to_string()));
            }
            self.rendered.push(spec.clone());
            Ok(())
        }
    }

    fn table() -> DataFrame {
        df!(
            WEEK_COL => [1i64, 2, 3],
            UNITS_SOLD_COL => [10.0, 30.0, 20.0],
            MARKETING_SPEND_COL => [100.0, 250.0, 180.0],
        )
        .unwrap()
    }

    fn totals() -> Vec<GroupValue> {
        vec![GroupValue {
            group: "Product A".to_string(),
            value: 600.0,
        }]
    }

    #[test]
    fn charts_come_in_fixed_order() {
        let specs = ChartPlotter::build_charts(&table(), &totals()).unwrap();
        let kinds: Vec<ChartKind> = specs.iter().map(|s| s.kind).collect();
        assert_eq!(kinds, vec![ChartKind::Line, ChartKind::Bar, ChartKind::Scatter]);
        assert!(specs.iter().all(|s| s.grid));
    }

    #[test]
    fn chart_data_follows_rows() {
        let specs = ChartPlotter::build_charts(&table(), &totals()).unwrap();

        assert_eq!(
            specs[0].data,
            ChartData::Points(vec![(1.0, 10.0), (2.0, 30.0), (3.0, 20.0)])
        );
        assert_eq!(
            specs[1].data,
            ChartData::Categories(vec![("Product A".to_string(), 600.0)])
        );
        assert_eq!(
            specs[2].data,
            ChartData::Points(vec![(100.0, 10.0), (250.0, 30.0), (180.0, 20.0)])
        );
    }

    #[test]
    fn render_stops_at_first_failure() {
        let specs = ChartPlotter::build_charts(&table(), &totals()).unwrap();
        let mut sink = RecordingSink {
            fail_on: Some(1),
            ..Default::default()
        };

        let err = ChartPlotter::render_all(&mut sink, &specs).unwrap_err();
        assert!(matches!(err, ChartError::Backend(_)));
        assert_eq!(sink.rendered.len(), 1);
    }

    #[test]
    fn missing_spend_column_is_an_error() {
        let df = df!(WEEK_COL => [1i64], UNITS_SOLD_COL => [1.0]).unwrap();
        assert!(ChartPlotter::build_charts(&df, &totals()).is_err());
    }
}
