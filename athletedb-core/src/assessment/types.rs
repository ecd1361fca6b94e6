//! Core assessment types

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::athlete::{Athlete, LengthUnit, Quantity, WeightUnit};
use crate::measurement::MeasurementValue;

/// One dated snapshot of an athlete's recorded measurements.
///
/// `measurements` maps measurement keys to their recorded values; it need
/// not cover every active descriptor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    pub id: String,
    pub athlete_id: String,
    pub assessment_date: NaiveDate,
    #[serde(default)]
    pub measurements: BTreeMap<String, MeasurementValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub general_comments: Option<String>,
    /// Unix timestamp (seconds)
    pub created_at: i64,
    pub updated_at: i64,
}

/// Assessment as submitted by a client. Used for both create and update;
/// an update replaces the entire measurements map.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDraft {
    pub athlete_id: String,
    pub assessment_date: NaiveDate,
    #[serde(default)]
    pub measurements: BTreeMap<String, MeasurementValue>,
    #[serde(default)]
    pub general_comments: Option<String>,
}

/// The referenced athlete's display fields, inlined on reads
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteRef {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Quantity<LengthUnit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Quantity<WeightUnit>>,
}

impl AthleteRef {
    pub fn from_athlete(athlete: &Athlete) -> Self {
        Self {
            id: athlete.id.clone(),
            name: athlete.name.clone(),
            date_of_birth: athlete.date_of_birth,
            age: athlete.age(),
            height: athlete.height,
            weight: athlete.weight,
        }
    }
}

/// A record plus its athlete's display fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentDetail {
    #[serde(flatten)]
    pub assessment: Assessment,
    /// Absent when the athlete reference dangles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub athlete: Option<AthleteRef>,
}

/// Lighter row for list views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentSummary {
    pub id: String,
    pub athlete_id: String,
    /// Absent when the athlete reference dangles
    #[serde(skip_serializing_if = "Option::is_none")]
    pub athlete_name: Option<String>,
    pub assessment_date: NaiveDate,
    pub measurement_count: u32,
    pub created_at: i64,
}
