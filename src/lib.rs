//! Sales Analysis - descriptive statistics and charts for an advertising CSV.
//!
//! The pipeline runs once, top to bottom: load, clean, aggregate, visualize,
//! analyze. Each stage takes the table from the previous one and returns a
//! structured result; `report` turns those results into console text.

pub mod charts;
pub mod config;
pub mod data;
pub mod report;
pub mod stats;

use anyhow::Context;
use charts::{ChartPlotter, ChartSink};
use config::AnalysisSettings;
use data::{DataLoader, DataProcessor};
use report::CleanedPreview;
use stats::{AnalysisResult, SalesSummary, StatsCalculator};
use std::io::Write;
use tracing::info;

/// Results of a full run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub summary: SalesSummary,
    pub analysis: AnalysisResult,
}

/// Run every stage in order, writing the report to `out` and charts to `sink`.
pub fn run<S, W>(
    settings: &AnalysisSettings,
    sink: &mut S,
    out: &mut W,
) -> anyhow::Result<PipelineOutcome>
where
    S: ChartSink + ?Sized,
    W: Write + ?Sized,
{
    let raw = DataLoader::load_csv(&settings.csv_path)
        .with_context(|| format!("loading {}", settings.csv_path.display()))?;
    write!(out, "{}", DataLoader::profile(&raw, settings.head_rows))?;

    let cleaned = DataProcessor::clean(&raw, settings).context("cleaning sales data")?;
    write!(out, "{}", CleanedPreview(&cleaned.head(Some(settings.head_rows))))?;

    let summary = StatsCalculator::summarize(&cleaned).context("summarizing sales")?;
    write!(out, "{summary}")?;
    out.flush()?;

    let enriched = DataProcessor::with_marketing_spend(&cleaned)?;
    let charts = ChartPlotter::build_charts(&enriched, &summary.total_revenue)?;
    ChartPlotter::render_all(sink, &charts).context("rendering charts")?;

    let analysis = StatsCalculator::analyze(&enriched).context("analyzing sales")?;
    write!(out, "{analysis}")?;
    out.flush()?;

    info!(rows = cleaned.height(), "analysis complete");
    Ok(PipelineOutcome { summary, analysis })
}
