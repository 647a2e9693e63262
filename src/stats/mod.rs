//! Stats module - aggregates and derived metrics

mod calculator;

pub use calculator::{
    round_to, AnalysisResult, GroupValue, SalesSummary, StatsCalculator, StatsError, INSIGHTS,
};
