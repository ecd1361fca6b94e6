//! Statistics result types

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::assessment::{Assessment, AssessmentSummary};

/// One month's bucket in a metric trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Short month name ("Jan", "Feb", ...)
    pub month: String,
    /// Arithmetic mean of the metric in the bucket, 2 decimals
    pub average: f64,
    /// How many records contributed
    pub count: u32,
}

/// One athlete's row in a cross-athlete comparison
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRow {
    pub athlete_id: String,
    pub athlete_name: String,
    /// Requested metrics present on the athlete's most recent record
    pub values: BTreeMap<String, f64>,
}

/// Counts and recency for the dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_athletes: u32,
    pub total_assessments: u32,
    /// Records dated on or after the first of the current calendar month
    pub assessments_this_month: u32,
    pub recent_assessments: Vec<AssessmentSummary>,
    /// totalAssessments / totalAthletes to 1 decimal, 0 when no athletes
    pub average_assessments_per_athlete: f64,
}

/// One dated row of an athlete's performance history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryPoint {
    pub date: NaiveDate,
    /// Metric key to aggregate value, for every metric present on the record
    pub values: BTreeMap<String, f64>,
}

/// Per-athlete statistics block
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteStats {
    pub total_assessments: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_assessment: Option<Assessment>,
    /// Newest first
    pub performance_history: Vec<HistoryPoint>,
}

/// One sample in a per-athlete metric trend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSample {
    pub date: NaiveDate,
    pub value: f64,
}
