//! Derived statistics over stored assessments

mod engine;
mod types;

pub use engine::StatsEngine;
pub use types::{
    AthleteStats, ComparisonRow, DashboardSummary, HistoryPoint, TrendPoint, TrendSample,
};
