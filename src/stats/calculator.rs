//! Statistics Calculator Module
//! Handles grouped aggregates, peak-week lookup, correlation and growth.

use crate::config::{MARKETING_SPEND_COL, PRODUCT_COL, REVENUE_COL, UNITS_SOLD_COL, WEEK_COL};
use crate::data::DataProcessor;
use polars::prelude::*;
use statrs::statistics::Statistics;
use thiserror::Error;
use tracing::debug;

/// Fixed observations printed after the computed metrics.
pub const INSIGHTS: [&str; 3] = [
    "1. Marketing spend has a positive relationship with units sold.",
    "2. Revenue depends directly on units sold since price is constant.",
    "3. There is noticeable sales growth across the weeks.",
];

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Cannot compute {0} of an empty table")]
    EmptyInput(&'static str),
}

/// One aggregated value for a group.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupValue {
    pub group: String,
    pub value: f64,
}

/// Descriptive statistics over the cleaned table.
#[derive(Debug, Clone)]
pub struct SalesSummary {
    pub total_revenue: Vec<GroupValue>,
    pub average_units: Vec<GroupValue>,
    pub peak_week: i64,
}

/// Derived metrics over the table with marketing spend.
#[derive(Debug, Clone)]
pub struct AnalysisResult {
    pub correlation: f64,
    pub growth: f64,
    pub insights: [&'static str; 3],
}

/// Round for display. NaN passes through unchanged.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Handles statistical calculations over the sales table.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Sum `value_col` per distinct `group_col`, in first-seen group order.
    pub fn group_sum(
        df: &DataFrame,
        group_col: &str,
        value_col: &str,
    ) -> Result<Vec<GroupValue>, StatsError> {
        Self::group_agg(df, group_col, col(value_col).cast(DataType::Float64).sum())
    }

    /// Mean of `value_col` per distinct `group_col`, in first-seen group order.
    pub fn group_mean(
        df: &DataFrame,
        group_col: &str,
        value_col: &str,
    ) -> Result<Vec<GroupValue>, StatsError> {
        Self::group_agg(df, group_col, col(value_col).cast(DataType::Float64).mean())
    }

    fn group_agg(df: &DataFrame, group_col: &str, agg: Expr) -> Result<Vec<GroupValue>, StatsError> {
        let grouped = df
            .clone()
            .lazy()
            .group_by_stable([col(group_col)])
            .agg([agg.alias("value")])
            .collect()?;

        let keys = grouped.column(group_col)?.cast(&DataType::String)?;
        let values = grouped.column("value")?.cast(&DataType::Float64)?;

        let groups = keys
            .as_materialized_series()
            .str()?
            .into_iter()
            .zip(values.f64()?.into_iter())
            .map(|(key, value)| GroupValue {
                group: key.unwrap_or_default().to_string(),
                value: value.unwrap_or(f64::NAN),
            })
            .collect();
        Ok(groups)
    }

    /// Index of the first maximum, ignoring NaN.
    pub fn first_argmax(values: &[f64]) -> Option<usize> {
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan())
            .fold(None::<(usize, f64)>, |best, (i, &v)| match best {
                Some((_, b)) if v <= b => best,
                _ => Some((i, v)),
            })
            .map(|(i, _)| i)
    }

    /// Week of the first row with the highest Units_Sold.
    pub fn peak_week(df: &DataFrame) -> Result<i64, StatsError> {
        let units = DataProcessor::numeric_values(df, UNITS_SOLD_COL)?;
        let idx = Self::first_argmax(&units).ok_or(StatsError::EmptyInput("argmax"))?;

        let weeks = df.column(WEEK_COL)?.cast(&DataType::Int64)?;
        let week = weeks.i64()?.get(idx);
        week.ok_or(StatsError::EmptyInput("argmax"))
    }

    /// Pearson correlation from sample covariance and sample standard deviations.
    /// Returns NaN when either series is constant or has fewer than two points.
    pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
        if x.len() != y.len() || x.len() < 2 {
            return f64::NAN;
        }

        let std_x = x.iter().std_dev();
        let std_y = y.iter().std_dev();
        if std_x == 0.0 || std_y == 0.0 {
            return f64::NAN;
        }

        x.iter().covariance(y.iter()) / (std_x * std_y)
    }

    /// Units_Sold of the last row minus Units_Sold of the first row, by position.
    pub fn growth(df: &DataFrame) -> Result<f64, StatsError> {
        let units = DataProcessor::numeric_values(df, UNITS_SOLD_COL)?;
        match (units.first(), units.last()) {
            (Some(first), Some(last)) => Ok(last - first),
            _ => Err(StatsError::EmptyInput("growth")),
        }
    }

    /// Total revenue and average units per product, plus the peak week.
    pub fn summarize(df: &DataFrame) -> Result<SalesSummary, StatsError> {
        let total_revenue = Self::group_sum(df, PRODUCT_COL, REVENUE_COL)?;
        let average_units = Self::group_mean(df, PRODUCT_COL, UNITS_SOLD_COL)?;
        let peak_week = Self::peak_week(df)?;
        debug!(groups = total_revenue.len(), peak_week, "summarized sales");

        Ok(SalesSummary {
            total_revenue,
            average_units,
            peak_week,
        })
    }

    /// Correlation between marketing spend and units sold, growth and insights.
    pub fn analyze(df: &DataFrame) -> Result<AnalysisResult, StatsError> {
        let spend = DataProcessor::numeric_values(df, MARKETING_SPEND_COL)?;
        let units = DataProcessor::numeric_values(df, UNITS_SOLD_COL)?;
        let correlation = Self::pearson(&spend, &units);
        let growth = Self::growth(df)?;
        debug!(correlation, growth, "analyzed sales");

        Ok(AnalysisResult {
            correlation,
            growth,
            insights: INSIGHTS,
        })
    }
}
