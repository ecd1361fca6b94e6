//! Query parameter types for assessment listings

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::types::AssessmentSummary;

/// Filters for listing assessments; every provided predicate ANDs together.
/// Results are ordered by assessment date, newest first.
#[derive(Debug, Clone, Default)]
pub struct AssessmentQuery {
    pub athlete_id: Option<String>,
    /// Assessed on or after this date
    pub start_date: Option<NaiveDate>,
    /// Assessed on or before this date
    pub end_date: Option<NaiveDate>,
    /// Max results (default 10, max 100)
    pub limit: u32,
    /// Offset for pagination
    pub offset: u32,
}

impl AssessmentQuery {
    pub fn new() -> Self {
        Self {
            limit: 10,
            ..Default::default()
        }
    }

    /// Clamp limit to valid range
    pub fn effective_limit(&self) -> u32 {
        self.limit.clamp(1, 100)
    }
}

/// Paginated assessment list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentListResult {
    pub assessments: Vec<AssessmentSummary>,
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = AssessmentQuery::new();
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset, 0);
        assert!(query.athlete_id.is_none());
    }

    #[test]
    fn test_effective_limit_clamping() {
        let mut query = AssessmentQuery::new();
        query.limit = 0;
        assert_eq!(query.effective_limit(), 1);

        query.limit = 1000;
        assert_eq!(query.effective_limit(), 100);
    }
}
