//! Statistics REST endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{Months, NaiveDate, Utc};
use serde::Deserialize;

use athletedb_core::{ComparisonRow, DashboardSummary, TrendPoint};

use crate::error::ApiError;
use crate::state::AppState;

use super::Envelope;

/// GET /api/statistics/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<DashboardSummary>>, ApiError> {
    let summary = state.stats.dashboard_summary()?;
    Ok(Json(Envelope::new(summary)))
}

/// Query params for cross-athlete trends
#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    pub metric: Option<String>,
    /// One of 1m, 3m, 6m, 1y (default 1y)
    pub timeframe: Option<String>,
}

/// GET /api/statistics/trends?metric=&timeframe=
pub async fn trends(
    State(state): State<Arc<AppState>>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<Envelope<Vec<TrendPoint>>>, ApiError> {
    let metric = query.metric.unwrap_or_else(|| "verticalJump".to_string());

    let end = Utc::now().date_naive();
    let start = timeframe_start(end, query.timeframe.as_deref());

    let trend = state.stats.trend(&metric, start, end)?;
    Ok(Json(Envelope::new(trend)))
}

fn timeframe_start(end: NaiveDate, timeframe: Option<&str>) -> NaiveDate {
    let months = match timeframe {
        Some("1m") => 1,
        Some("3m") => 3,
        Some("6m") => 6,
        _ => 12,
    };
    end.checked_sub_months(Months::new(months)).unwrap_or(end)
}

/// Query params for cross-athlete comparison
#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    /// Comma-separated athlete ids
    pub athletes: Option<String>,
    /// Comma-separated metric keys
    pub metrics: Option<String>,
}

/// GET /api/statistics/compare?athletes=a,b&metrics=x,y
pub async fn compare(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CompareQuery>,
) -> Result<Json<Envelope<Vec<ComparisonRow>>>, ApiError> {
    let athletes = query
        .athletes
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("athletes", "is required"))?;
    let metrics = query
        .metrics
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("metrics", "is required"))?;

    let athlete_ids: Vec<String> = athletes.split(',').map(|s| s.trim().to_string()).collect();
    let metric_keys: Vec<String> = metrics.split(',').map(|s| s.trim().to_string()).collect();

    let rows = state.stats.compare(&athlete_ids, &metric_keys)?;
    Ok(Json(Envelope::new(rows)))
}
