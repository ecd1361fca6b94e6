//! Built-in measurement descriptors
//!
//! The fixed set every installation starts from. `reinitialize_defaults`
//! upserts these by key, so admins can always restore them without losing
//! custom descriptors.

use super::types::{Category, MeasurementType, ValueKind};

/// The built-in descriptor set, ready for upserting
pub fn builtin_defaults() -> Vec<MeasurementType> {
    vec![
        // Movement screen
        MeasurementType::new(
            "overheadSquat",
            "Overhead Squat",
            Category::MovementScreen,
            ValueKind::Score,
        )
        .with_range(1.0, 3.0)
        .as_builtin_default(),
        MeasurementType::new(
            "hurdleStep",
            "Hurdle Step",
            Category::MovementScreen,
            ValueKind::Score,
        )
        .with_range(1.0, 3.0)
        .as_builtin_default(),
        MeasurementType::new(
            "inlineLunge",
            "Inline Lunge",
            Category::MovementScreen,
            ValueKind::Score,
        )
        .with_range(1.0, 3.0)
        .as_builtin_default(),
        MeasurementType::new(
            "apleyScratch",
            "Apley's Scratch",
            Category::MovementScreen,
            ValueKind::PassFail,
        )
        .as_builtin_default(),
        MeasurementType::new(
            "handGrip",
            "Hand Grip",
            Category::MovementScreen,
            ValueKind::Strength,
        )
        .with_unit("lbs")
        .as_builtin_default(),
        // Performance
        MeasurementType::new(
            "verticalJump",
            "Vertical Jump",
            Category::Performance,
            ValueKind::Distance,
        )
        .with_unit("in")
        .with_sides(false)
        .with_attempts(3)
        .as_builtin_default(),
        MeasurementType::new(
            "broadJump",
            "Broad Jump",
            Category::Performance,
            ValueKind::Distance,
        )
        .with_unit("in")
        .with_sides(false)
        .with_attempts(3)
        .as_builtin_default(),
        MeasurementType::new(
            "tenYardSprint",
            "10-Yard Sprint",
            Category::Performance,
            ValueKind::Time,
        )
        .with_sides(false)
        .with_attempts(3)
        .as_builtin_default(),
    ]
}
