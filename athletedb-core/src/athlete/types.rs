//! Core athlete types

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::db::unix_now;
use crate::validation::ValidationErrors;

/// Unit for recorded heights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    In,
    Cm,
}

impl LengthUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::In => "in",
            Self::Cm => "cm",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "in" => Some(Self::In),
            "cm" => Some(Self::Cm),
            _ => None,
        }
    }
}

/// Unit for recorded weights
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    Lbs,
    Kg,
}

impl WeightUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lbs => "lbs",
            Self::Kg => "kg",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "lbs" => Some(Self::Lbs),
            "kg" => Some(Self::Kg),
            _ => None,
        }
    }
}

/// A measured quantity with its unit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity<U> {
    pub value: f64,
    pub unit: U,
}

/// An athlete and their anthropometrics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Athlete {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Quantity<LengthUnit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<Quantity<WeightUnit>>,
    /// Unix timestamp (seconds)
    pub created_at: i64,
    pub updated_at: i64,
}

impl Athlete {
    pub fn new(name: impl Into<String>) -> Self {
        let now = unix_now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            date_of_birth: None,
            height: None,
            weight: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Age in whole years as of today, when the date of birth is known
    pub fn age(&self) -> Option<i32> {
        self.date_of_birth
            .map(|dob| age_on(dob, Utc::now().date_naive()))
    }
}

/// Whole-year age on `today` for a birth date
pub(crate) fn age_on(dob: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - dob.year();
    if (today.month(), today.day()) < (dob.month(), dob.day()) {
        age -= 1;
    }
    age
}

/// Athlete as submitted by a client
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AthleteDraft {
    pub name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub height: Option<Quantity<LengthUnit>>,
    pub weight: Option<Quantity<WeightUnit>>,
}

impl AthleteDraft {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        if self.name.trim().is_empty() {
            return Err(ValidationErrors::single("name", "is required"));
        }
        Ok(())
    }
}

/// Partial update to an athlete; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AthleteUpdate {
    pub name: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub height: Option<Quantity<LengthUnit>>,
    pub weight: Option<Quantity<WeightUnit>>,
}

impl AthleteUpdate {
    pub fn apply(self, athlete: &mut Athlete) {
        if let Some(name) = self.name {
            athlete.name = name;
        }
        if let Some(date_of_birth) = self.date_of_birth {
            athlete.date_of_birth = Some(date_of_birth);
        }
        if let Some(height) = self.height {
            athlete.height = Some(height);
        }
        if let Some(weight) = self.weight {
            athlete.weight = Some(weight);
        }
    }
}

/// Query parameters for listing athletes
#[derive(Debug, Clone, Default)]
pub struct AthleteQuery {
    /// Case-insensitive substring match on the name
    pub search: Option<String>,
    /// Max results (default 10, max 100)
    pub limit: u32,
    /// Offset for pagination
    pub offset: u32,
}

impl AthleteQuery {
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

/// Athlete row for list views
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteSummary {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    pub assessment_count: u32,
    pub created_at: i64,
}

/// Paginated athlete list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AthleteListResult {
    pub athletes: Vec<AthleteSummary>,
    pub total: u32,
    pub limit: u32,
    pub offset: u32,
}
