//! Measurement descriptor types

use serde::{Deserialize, Serialize};

use crate::db::unix_now;
use crate::validation::ValidationErrors;

/// Groups descriptors for form layout and aggregation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    MovementScreen,
    Performance,
}

impl Category {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MovementScreen => "movementScreen",
            Self::Performance => "performance",
        }
    }

    /// Parse from database string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "movementScreen" => Some(Self::MovementScreen),
            "performance" => Some(Self::Performance),
            _ => None,
        }
    }
}

/// What a recorded value for a descriptor looks like
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValueKind {
    Score,
    PassFail,
    Strength,
    Distance,
    Time,
    Speed,
    Reps,
}

impl ValueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::PassFail => "passFail",
            Self::Strength => "strength",
            Self::Distance => "distance",
            Self::Time => "time",
            Self::Speed => "speed",
            Self::Reps => "reps",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "score" => Some(Self::Score),
            "passFail" => Some(Self::PassFail),
            "strength" => Some(Self::Strength),
            "distance" => Some(Self::Distance),
            "time" => Some(Self::Time),
            "speed" => Some(Self::Speed),
            "reps" => Some(Self::Reps),
            _ => None,
        }
    }

    /// Kinds measuring a physical quantity must carry a unit
    pub fn requires_unit(&self) -> bool {
        matches!(self, Self::Strength | Self::Distance | Self::Speed)
    }

    /// Directionality assumed when the admin does not set one
    pub fn default_directionality(&self) -> Directionality {
        match self {
            Self::Time => Directionality::LowerIsBetter,
            _ => Directionality::HigherIsBetter,
        }
    }

    /// Which value variant records of this kind use
    pub fn family(&self) -> ValueFamily {
        match self {
            Self::Score => ValueFamily::Score,
            Self::PassFail => ValueFamily::PassFail,
            _ => ValueFamily::Numeric,
        }
    }
}

/// The three recordable value shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueFamily {
    Score,
    PassFail,
    Numeric,
}

impl ValueFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::PassFail => "passFail",
            Self::Numeric => "numeric",
        }
    }
}

/// Whether higher or lower raw values represent better performance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Directionality {
    HigherIsBetter,
    LowerIsBetter,
}

impl Directionality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::HigherIsBetter => "higherIsBetter",
            Self::LowerIsBetter => "lowerIsBetter",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "higherIsBetter" => Some(Self::HigherIsBetter),
            "lowerIsBetter" => Some(Self::LowerIsBetter),
            _ => None,
        }
    }
}

/// Whether multiple raw attempts are recorded and a best derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptPolicy {
    pub enabled: bool,
    pub max_attempts: u32,
}

impl Default for AttemptPolicy {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attempts: 3,
        }
    }
}

impl AttemptPolicy {
    pub fn up_to(max_attempts: u32) -> Self {
        Self {
            enabled: true,
            max_attempts,
        }
    }
}

/// Admin-defined metadata describing a recordable metric's shape and
/// validation rules
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementType {
    /// Store-generated id
    pub id: String,
    /// Unique stable identifier used as the map key in records
    pub key: String,
    /// Display label
    pub name: String,
    pub category: Category,
    pub kind: ValueKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub directionality: Directionality,
    /// Appears on every new assessment form by default
    pub is_default: bool,
    /// Soft-delete flag; inactive descriptors are excluded from new-record
    /// validation while historical records stay valid
    pub is_active: bool,
    /// Recorded per left/right side independently
    pub sidedness: bool,
    pub attempts: AttemptPolicy,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_value: Option<f64>,
    /// Unix timestamp (seconds)
    pub created_at: i64,
    pub updated_at: i64,
}

impl MeasurementType {
    /// Create a descriptor with the defaults the registry assumes: active,
    /// sided, no attempts, directionality derived from the kind.
    pub fn new(
        key: impl Into<String>,
        name: impl Into<String>,
        category: Category,
        kind: ValueKind,
    ) -> Self {
        let now = unix_now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            key: key.into(),
            name: name.into(),
            category,
            kind,
            unit: None,
            directionality: kind.default_directionality(),
            is_default: false,
            is_active: true,
            sidedness: true,
            attempts: AttemptPolicy::default(),
            min_value: None,
            max_value: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_sides(mut self, sidedness: bool) -> Self {
        self.sidedness = sidedness;
        self
    }

    pub fn with_attempts(mut self, max_attempts: u32) -> Self {
        self.attempts = AttemptPolicy::up_to(max_attempts);
        self
    }

    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min_value = Some(min);
        self.max_value = Some(max);
        self
    }

    pub fn as_builtin_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    /// Score bounds for validation: explicit bounds, or the 1-3 default
    pub fn score_range(&self) -> (f64, f64) {
        (self.min_value.unwrap_or(1.0), self.max_value.unwrap_or(3.0))
    }

    /// Field checks that do not need the store (required names, unit
    /// presence, attempt policy sanity)
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.key.trim().is_empty() {
            errors.push("key", "is required");
        }
        if self.name.trim().is_empty() {
            errors.push("name", "is required");
        }
        if self.kind.requires_unit() && self.unit.as_deref().is_none_or(|u| u.trim().is_empty()) {
            errors.push(
                "unit",
                format!("is required for {} measurements", self.kind.as_str()),
            );
        }
        if self.attempts.enabled && self.attempts.max_attempts == 0 {
            errors.push("attempts.maxAttempts", "must be at least 1");
        }
        errors.into_result()
    }
}

/// Descriptor as submitted by the admin UI; ids and stamps are assigned by
/// the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeasurementTypeDraft {
    pub key: String,
    pub name: String,
    pub category: Category,
    pub kind: ValueKind,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub directionality: Option<Directionality>,
    #[serde(default)]
    pub is_default: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub sidedness: bool,
    #[serde(default)]
    pub attempts: Option<AttemptPolicy>,
    #[serde(default)]
    pub min_value: Option<f64>,
    #[serde(default)]
    pub max_value: Option<f64>,
}

fn default_true() -> bool {
    true
}

impl MeasurementTypeDraft {
    /// Build a full descriptor. Performance metrics record attempts unless
    /// the draft says otherwise.
    pub fn into_type(self) -> MeasurementType {
        let mut descriptor =
            MeasurementType::new(self.key, self.name, self.category, self.kind);
        descriptor.unit = self.unit;
        if let Some(directionality) = self.directionality {
            descriptor.directionality = directionality;
        }
        descriptor.is_default = self.is_default;
        descriptor.is_active = self.is_active;
        descriptor.sidedness = self.sidedness;
        descriptor.attempts = self.attempts.unwrap_or(AttemptPolicy {
            enabled: self.category == Category::Performance,
            max_attempts: 3,
        });
        descriptor.min_value = self.min_value;
        descriptor.max_value = self.max_value;
        descriptor
    }
}

/// Partial update to a descriptor; absent fields keep their stored value
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MeasurementTypeUpdate {
    pub key: Option<String>,
    pub name: Option<String>,
    pub category: Option<Category>,
    pub kind: Option<ValueKind>,
    pub unit: Option<String>,
    pub directionality: Option<Directionality>,
    pub is_default: Option<bool>,
    pub is_active: Option<bool>,
    pub sidedness: Option<bool>,
    pub attempts: Option<AttemptPolicy>,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
}

impl MeasurementTypeUpdate {
    pub fn apply(self, descriptor: &mut MeasurementType) {
        if let Some(key) = self.key {
            descriptor.key = key;
        }
        if let Some(name) = self.name {
            descriptor.name = name;
        }
        if let Some(category) = self.category {
            descriptor.category = category;
        }
        if let Some(kind) = self.kind {
            descriptor.kind = kind;
        }
        if let Some(unit) = self.unit {
            descriptor.unit = Some(unit);
        }
        if let Some(directionality) = self.directionality {
            descriptor.directionality = directionality;
        }
        if let Some(is_default) = self.is_default {
            descriptor.is_default = is_default;
        }
        if let Some(is_active) = self.is_active {
            descriptor.is_active = is_active;
        }
        if let Some(sidedness) = self.sidedness {
            descriptor.sidedness = sidedness;
        }
        if let Some(attempts) = self.attempts {
            descriptor.attempts = attempts;
        }
        if let Some(min_value) = self.min_value {
            descriptor.min_value = Some(min_value);
        }
        if let Some(max_value) = self.max_value {
            descriptor.max_value = Some(max_value);
        }
    }
}

/// Filters for listing descriptors
#[derive(Debug, Clone, Default)]
pub struct TypeFilter {
    pub category: Option<Category>,
    pub is_active: Option<bool>,
}
