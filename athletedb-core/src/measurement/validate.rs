//! Validation of recorded values against their descriptor

use crate::registry::MeasurementType;
use crate::validation::ValidationErrors;

use super::value::MeasurementValue;

/// Check one measurement value against its descriptor, collecting every
/// violation instead of stopping at the first.
pub fn validate_value(
    key: &str,
    value: &MeasurementValue,
    descriptor: &MeasurementType,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    let expected = descriptor.kind.family();
    if value.family() != expected {
        errors.push(
            key,
            format!(
                "expected a {} value for a {} measurement",
                expected.as_str(),
                descriptor.kind.as_str()
            ),
        );
        return errors;
    }

    match value {
        MeasurementValue::Score {
            score,
            score_left,
            score_right,
            ..
        } => {
            check_sides(
                key,
                descriptor,
                score.is_some(),
                score_left.is_some() || score_right.is_some(),
                &mut errors,
            );
            let (min, max) = descriptor.score_range();
            for (field, entry) in [
                ("score", score),
                ("scoreLeft", score_left),
                ("scoreRight", score_right),
            ] {
                if let Some(v) = entry {
                    let v = f64::from(*v);
                    if v < min || v > max {
                        errors.push(
                            format!("{key}.{field}"),
                            format!("must be between {min} and {max}"),
                        );
                    }
                }
            }
        }

        MeasurementValue::PassFail {
            score_left,
            score_right,
            ..
        } => {
            // Outcome membership is enforced by the codec itself; only the
            // sidedness rule remains
            check_sides(
                key,
                descriptor,
                false,
                score_left.is_recorded() || score_right.is_recorded(),
                &mut errors,
            );
        }

        MeasurementValue::Numeric {
            value,
            value_left,
            value_right,
            attempts,
            ..
        } => {
            check_sides(
                key,
                descriptor,
                value.is_some() || !attempts.is_empty(),
                value_left.is_some() || value_right.is_some(),
                &mut errors,
            );

            if !attempts.is_empty() {
                if !descriptor.attempts.enabled {
                    errors.push(
                        format!("{key}.attempts"),
                        "attempts are not recorded for this measurement",
                    );
                } else if attempts.len() > descriptor.attempts.max_attempts as usize {
                    errors.push(
                        format!("{key}.attempts"),
                        format!("at most {} attempts allowed", descriptor.attempts.max_attempts),
                    );
                }
            }

            for (field, entry) in [
                ("value", value),
                ("valueLeft", value_left),
                ("valueRight", value_right),
            ] {
                if let Some(v) = entry {
                    check_number(key, field, *v, descriptor, &mut errors);
                }
            }
            for (i, attempt) in attempts.iter().enumerate() {
                if let Some(v) = attempt {
                    check_number(key, &format!("attempts.{i}"), *v, descriptor, &mut errors);
                }
            }
        }
    }

    errors
}

fn check_sides(
    key: &str,
    descriptor: &MeasurementType,
    scalar_used: bool,
    sides_used: bool,
    errors: &mut ValidationErrors,
) {
    if descriptor.sidedness && scalar_used {
        errors.push(key, "is recorded per side; use the left/right fields");
    }
    if !descriptor.sidedness && sides_used {
        errors.push(key, "is not recorded per side");
    }
}

fn check_number(
    key: &str,
    field: &str,
    v: f64,
    descriptor: &MeasurementType,
    errors: &mut ValidationErrors,
) {
    if !v.is_finite() {
        errors.push(format!("{key}.{field}"), "must be a finite number");
        return;
    }
    // Zero is the untaken-attempt placeholder; bounds apply to real readings
    if v == 0.0 {
        return;
    }
    if let Some(min) = descriptor.min_value
        && v < min
    {
        errors.push(format!("{key}.{field}"), format!("must be at least {min}"));
    }
    if let Some(max) = descriptor.max_value
        && v > max
    {
        errors.push(format!("{key}.{field}"), format!("must be at most {max}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::value::SideOutcome;
    use crate::registry::{Category, MeasurementType, ValueKind};

    fn score_descriptor() -> MeasurementType {
        MeasurementType::new(
            "overheadSquat",
            "Overhead Squat",
            Category::MovementScreen,
            ValueKind::Score,
        )
        .with_range(1.0, 3.0)
    }

    fn jump_descriptor() -> MeasurementType {
        MeasurementType::new(
            "verticalJump",
            "Vertical Jump",
            Category::Performance,
            ValueKind::Distance,
        )
        .with_unit("in")
        .with_sides(false)
        .with_attempts(3)
    }

    #[test]
    fn test_score_in_range_passes() {
        let value = MeasurementValue::sided_score(3, 2);
        assert!(validate_value("overheadSquat", &value, &score_descriptor()).is_empty());
    }

    #[test]
    fn test_score_out_of_range_fails() {
        let value = MeasurementValue::sided_score(4, 2);
        let errors = validate_value("overheadSquat", &value, &score_descriptor());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.errors[0].field, "overheadSquat.scoreLeft");
    }

    #[test]
    fn test_family_mismatch_fails() {
        let value = MeasurementValue::from_attempts(vec![Some(2.0)]);
        let errors = validate_value("overheadSquat", &value, &score_descriptor());
        assert_eq!(errors.len(), 1);
        assert!(errors.errors[0].message.contains("score measurement"));
    }

    #[test]
    fn test_sided_descriptor_rejects_scalar_score() {
        let value = MeasurementValue::Score {
            score: Some(2),
            score_left: None,
            score_right: None,
            comments: None,
        };
        let errors = validate_value("overheadSquat", &value, &score_descriptor());
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_unsided_descriptor_rejects_side_values() {
        let value = MeasurementValue::Numeric {
            value: None,
            value_left: Some(10.0),
            value_right: Some(11.0),
            attempts: vec![],
            comments: None,
        };
        let errors = validate_value("verticalJump", &value, &jump_descriptor());
        assert!(!errors.is_empty());
    }

    #[test]
    fn test_too_many_attempts_fails() {
        let value =
            MeasurementValue::from_attempts(vec![Some(1.0), Some(2.0), Some(3.0), Some(4.0)]);
        let errors = validate_value("verticalJump", &value, &jump_descriptor());
        assert_eq!(errors.len(), 1);
        assert!(errors.errors[0].message.contains("at most 3"));
    }

    #[test]
    fn test_attempts_without_policy_fails() {
        let descriptor = MeasurementType::new(
            "handGrip",
            "Hand Grip",
            Category::MovementScreen,
            ValueKind::Strength,
        )
        .with_unit("lbs")
        .with_sides(false);
        let value = MeasurementValue::from_attempts(vec![Some(100.0)]);
        let errors = validate_value("handGrip", &value, &descriptor);
        assert!(
            errors
                .errors
                .iter()
                .any(|e| e.field == "handGrip.attempts")
        );
    }

    #[test]
    fn test_pass_fail_sides_ok() {
        let descriptor = MeasurementType::new(
            "apleyScratch",
            "Apley's Scratch",
            Category::MovementScreen,
            ValueKind::PassFail,
        );
        let value = MeasurementValue::PassFail {
            score_left: SideOutcome::Pass,
            score_right: SideOutcome::NotRecorded,
            comments: Some("limited right shoulder".into()),
        };
        assert!(validate_value("apleyScratch", &value, &descriptor).is_empty());
    }

    #[test]
    fn test_violations_are_batched() {
        let value = MeasurementValue::Score {
            score: Some(9),
            score_left: Some(4),
            score_right: None,
            comments: None,
        };
        let errors = validate_value("overheadSquat", &value, &score_descriptor());
        // scalar-on-sided plus two range violations
        assert_eq!(errors.len(), 3);
    }
}
