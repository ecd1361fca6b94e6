//! Recorded measurement values

use serde::{Deserialize, Serialize};

use crate::registry::{Directionality, ValueFamily};

use super::best::compute_best;

/// Outcome of a pass/fail screen on one side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SideOutcome {
    #[serde(rename = "pass")]
    Pass,
    #[serde(rename = "fail")]
    Fail,
    /// Not tested; serialized as the empty string the API has always used
    #[default]
    #[serde(rename = "")]
    NotRecorded,
}

impl SideOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::NotRecorded => "",
        }
    }

    pub fn is_recorded(&self) -> bool {
        !matches!(self, Self::NotRecorded)
    }
}

/// One recorded measurement inside an assessment.
///
/// The legal variant for a given measurement key is decided by a registry
/// lookup at validation time; the tag exists so stored maps stay decodable
/// even after their descriptor is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MeasurementValue {
    /// Movement-screen style score (1-3 by default)
    #[serde(rename_all = "camelCase")]
    Score {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score: Option<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score_left: Option<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        score_right: Option<u8>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comments: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    PassFail {
        #[serde(default)]
        score_left: SideOutcome,
        #[serde(default)]
        score_right: SideOutcome,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comments: Option<String>,
    },
    /// Numeric measurement, optionally with raw attempts and a derived best
    #[serde(rename_all = "camelCase")]
    Numeric {
        /// Scalar reading, or the best derived from `attempts`
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value_left: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value_right: Option<f64>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        attempts: Vec<Option<f64>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        comments: Option<String>,
    },
}

impl MeasurementValue {
    pub fn family(&self) -> ValueFamily {
        match self {
            Self::Score { .. } => ValueFamily::Score,
            Self::PassFail { .. } => ValueFamily::PassFail,
            Self::Numeric { .. } => ValueFamily::Numeric,
        }
    }

    /// The single number this measurement contributes to aggregation, if any
    pub fn metric_value(&self) -> Option<f64> {
        match self {
            Self::Numeric { value, .. } => *value,
            Self::Score { score, .. } => score.map(f64::from),
            Self::PassFail { .. } => None,
        }
    }

    /// Recompute the derived best from attempts.
    ///
    /// Idempotent, and legal on partial attempt sets. A non-empty attempts
    /// list owns `value`: when every attempt is invalid the stale best is
    /// cleared rather than left behind.
    pub fn normalize(&mut self, directionality: Directionality) {
        if let Self::Numeric {
            value, attempts, ..
        } = self
            && !attempts.is_empty()
        {
            *value = compute_best(attempts, directionality);
        }
    }

    /// Convenience constructor for attempt-based numeric measurements
    pub fn from_attempts(attempts: Vec<Option<f64>>) -> Self {
        Self::Numeric {
            value: None,
            value_left: None,
            value_right: None,
            attempts,
            comments: None,
        }
    }

    /// Convenience constructor for a sided score
    pub fn sided_score(left: u8, right: u8) -> Self {
        Self::Score {
            score: None,
            score_left: Some(left),
            score_right: Some(right),
            comments: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_serde_roundtrip() {
        let value = MeasurementValue::sided_score(2, 3);
        let json = serde_json::to_string(&value).unwrap();
        assert!(json.contains("\"kind\":\"score\""));
        assert!(json.contains("\"scoreLeft\":2"));

        let parsed: MeasurementValue = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, value);
    }

    #[test]
    fn test_pass_fail_blank_side_serializes_as_empty_string() {
        let value = MeasurementValue::PassFail {
            score_left: SideOutcome::Pass,
            score_right: SideOutcome::NotRecorded,
            comments: None,
        };
        let json = serde_json::to_value(&value).unwrap();
        assert_eq!(json["scoreLeft"], "pass");
        assert_eq!(json["scoreRight"], "");
    }

    #[test]
    fn test_pass_fail_rejects_unknown_outcome() {
        let json = r#"{"kind":"passFail","scoreLeft":"maybe"}"#;
        assert!(serde_json::from_str::<MeasurementValue>(json).is_err());
    }

    #[test]
    fn test_normalize_recomputes_best() {
        let mut value = MeasurementValue::from_attempts(vec![Some(27.5), Some(28.5), Some(28.0)]);
        value.normalize(Directionality::HigherIsBetter);
        assert_eq!(value.metric_value(), Some(28.5));

        // Idempotent
        value.normalize(Directionality::HigherIsBetter);
        assert_eq!(value.metric_value(), Some(28.5));
    }

    #[test]
    fn test_normalize_clears_stale_best() {
        let mut value = MeasurementValue::Numeric {
            value: Some(99.0),
            value_left: None,
            value_right: None,
            attempts: vec![Some(0.0), None],
            comments: None,
        };
        value.normalize(Directionality::HigherIsBetter);
        assert_eq!(value.metric_value(), None);
    }

    #[test]
    fn test_normalize_leaves_manual_scalar_alone() {
        let mut value = MeasurementValue::Numeric {
            value: Some(42.0),
            value_left: None,
            value_right: None,
            attempts: vec![],
            comments: None,
        };
        value.normalize(Directionality::HigherIsBetter);
        assert_eq!(value.metric_value(), Some(42.0));
    }

    #[test]
    fn test_metric_value_for_unsided_score() {
        let value = MeasurementValue::Score {
            score: Some(3),
            score_left: None,
            score_right: None,
            comments: None,
        };
        assert_eq!(value.metric_value(), Some(3.0));
    }
}
