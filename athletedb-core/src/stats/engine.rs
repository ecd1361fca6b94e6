//! Aggregation over stored assessments
//!
//! Everything here is a plain reduction over records pulled from the store;
//! the store only filters and orders, the engine extracts and folds.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};

use crate::assessment::AssessmentStore;
use crate::athlete::AthleteStore;
use crate::error::StoreError;
use crate::measurement::MeasurementValue;

use super::types::{
    AthleteStats, ComparisonRow, DashboardSummary, HistoryPoint, TrendPoint, TrendSample,
};

/// Derived statistics over the athlete and assessment collections
pub struct StatsEngine<S> {
    store: Arc<S>,
}

impl<S> StatsEngine<S>
where
    S: AthleteStore + AssessmentStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Counts, recency and averages for the dashboard
    pub fn dashboard_summary(&self) -> Result<DashboardSummary, StoreError> {
        let total_athletes = self.store.count_athletes()?;
        let total_assessments = self.store.count_assessments()?;

        let today = Utc::now().date_naive();
        let start_of_month = today.with_day(1).unwrap_or(today);
        let assessments_this_month = self.store.count_assessments_since(start_of_month)?;

        let recent_assessments = self.store.recent_assessments(5)?;

        let average_assessments_per_athlete = if total_athletes > 0 {
            let raw = f64::from(total_assessments) / f64::from(total_athletes);
            (raw * 10.0).round() / 10.0
        } else {
            0.0
        };

        Ok(DashboardSummary {
            total_athletes,
            total_assessments,
            assessments_this_month,
            recent_assessments,
            average_assessments_per_athlete,
        })
    }

    /// Monthly trend of a metric across all athletes.
    ///
    /// Records lacking a value for the metric are skipped. Buckets are keyed
    /// by (year, month) so a long range never merges two Januaries, and come
    /// back in chronological order labeled with the short month name.
    pub fn trend(
        &self,
        metric_key: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<TrendPoint>, StoreError> {
        let assessments = self.store.assessments_in_range(start, end)?;

        let mut order: Vec<(i32, u32)> = Vec::new();
        let mut buckets: HashMap<(i32, u32), Vec<f64>> = HashMap::new();
        for assessment in &assessments {
            let Some(value) = assessment
                .measurements
                .get(metric_key)
                .and_then(MeasurementValue::metric_value)
            else {
                continue;
            };
            let bucket = (
                assessment.assessment_date.year(),
                assessment.assessment_date.month(),
            );
            if !buckets.contains_key(&bucket) {
                order.push(bucket);
            }
            buckets.entry(bucket).or_default().push(value);
        }

        Ok(order
            .into_iter()
            .map(|bucket| {
                let values = &buckets[&bucket];
                let mean = values.iter().sum::<f64>() / values.len() as f64;
                TrendPoint {
                    month: month_label(bucket.1),
                    average: (mean * 100.0).round() / 100.0,
                    count: values.len() as u32,
                }
            })
            .collect())
    }

    /// Latest-record comparison across athletes.
    ///
    /// Athletes with no assessment record (or unknown ids) are omitted
    /// rather than reported as errors.
    pub fn compare(
        &self,
        athlete_ids: &[String],
        metric_keys: &[String],
    ) -> Result<Vec<ComparisonRow>, StoreError> {
        let mut rows = Vec::new();
        for athlete_id in athlete_ids {
            let Some(athlete) = self.store.get_athlete(athlete_id)? else {
                continue;
            };
            let Some(latest) = self.store.latest_assessment_for_athlete(athlete_id)? else {
                continue;
            };

            let mut values = BTreeMap::new();
            for key in metric_keys {
                if let Some(value) = latest
                    .measurements
                    .get(key)
                    .and_then(MeasurementValue::metric_value)
                {
                    values.insert(key.clone(), value);
                }
            }
            rows.push(ComparisonRow {
                athlete_id: athlete.id,
                athlete_name: athlete.name,
                values,
            });
        }
        Ok(rows)
    }

    /// Per-athlete statistics block for the detail page
    pub fn athlete_stats(&self, athlete_id: &str) -> Result<AthleteStats, StoreError> {
        if self.store.get_athlete(athlete_id)?.is_none() {
            return Err(StoreError::not_found("athlete", athlete_id));
        }

        let assessments = self.store.assessments_for_athlete(athlete_id)?;
        let performance_history = assessments
            .iter()
            .map(|assessment| HistoryPoint {
                date: assessment.assessment_date,
                values: assessment
                    .measurements
                    .iter()
                    .filter_map(|(key, value)| {
                        value.metric_value().map(|v| (key.clone(), v))
                    })
                    .collect(),
            })
            .collect();

        Ok(AthleteStats {
            total_assessments: assessments.len() as u32,
            latest_assessment: assessments.into_iter().next(),
            performance_history,
        })
    }

    /// One athlete's metric over time, oldest first
    pub fn athlete_trend(
        &self,
        athlete_id: &str,
        metric_key: &str,
    ) -> Result<Vec<TrendSample>, StoreError> {
        if self.store.get_athlete(athlete_id)?.is_none() {
            return Err(StoreError::not_found("athlete", athlete_id));
        }

        let assessments = self.store.assessments_for_athlete(athlete_id)?;
        Ok(assessments
            .iter()
            .rev()
            .filter_map(|assessment| {
                assessment
                    .measurements
                    .get(metric_key)
                    .and_then(MeasurementValue::metric_value)
                    .map(|value| TrendSample {
                        date: assessment.assessment_date,
                        value,
                    })
            })
            .collect())
    }
}

fn month_label(month: u32) -> String {
    NaiveDate::from_ymd_opt(2000, month, 1)
        .map(|d| d.format("%b").to_string())
        .unwrap_or_default()
}
