//! Sales Analysis - loads `advertising.csv`, prints summary statistics and
//! displays three charts.

use sales_analysis::charts::StaticChartRenderer;
use sales_analysis::config::AnalysisSettings;
use tracing_subscriber::EnvFilter;

/// Logs go to stderr so stdout carries only the report.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    let settings = AnalysisSettings::default();
    let mut renderer = StaticChartRenderer::new(settings.chart_dir.clone(), settings.chart_size);

    let stdout = std::io::stdout();
    sales_analysis::run(&settings, &mut renderer, &mut stdout.lock())?;
    Ok(())
}
