//! `athletedb seed` - load a small sample dataset

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Months, NaiveDate, Utc};
use clap::Args;

use athletedb_core::{
    AssessmentDraft, AssessmentService, AthleteDraft, AthleteStore, LengthUnit,
    MeasurementTypeStore, MeasurementValue, Quantity, SideOutcome, SqliteStore, WeightUnit,
};

#[derive(Args)]
pub struct SeedArgs {
    /// Path to the SQLite database file
    #[arg(long, default_value = "athletedb.sqlite3")]
    pub db: PathBuf,
}

struct SampleAthlete {
    name: &'static str,
    date_of_birth: &'static str,
    height_in: f64,
    weight_lbs: f64,
    /// (months ago, jump attempts, sprint attempts)
    sessions: Vec<(u32, [f64; 3], [f64; 3])>,
}

fn sample_athletes() -> Vec<SampleAthlete> {
    vec![
        SampleAthlete {
            name: "Jane Doe",
            date_of_birth: "2008-06-15",
            height_in: 66.0,
            weight_lbs: 140.0,
            sessions: vec![
                (4, [26.0, 26.5, 25.5], [1.78, 1.75, 1.80]),
                (2, [27.0, 27.5, 26.5], [1.72, 1.70, 1.74]),
                (0, [27.5, 28.5, 28.0], [1.70, 1.65, 1.68]),
            ],
        },
        SampleAthlete {
            name: "John Smith",
            date_of_birth: "2007-02-03",
            height_in: 71.0,
            weight_lbs: 172.0,
            sessions: vec![
                (3, [29.0, 29.5, 28.0], [1.66, 1.64, 1.69]),
                (1, [30.0, 30.5, 29.5], [1.62, 1.60, 1.63]),
            ],
        },
        SampleAthlete {
            name: "Maria Garcia",
            date_of_birth: "2009-11-21",
            height_in: 64.0,
            weight_lbs: 128.0,
            sessions: vec![(0, [24.0, 24.5, 23.5], [1.85, 1.82, 1.88])],
        },
    ]
}

pub fn run(args: SeedArgs) -> Result<()> {
    let store = Arc::new(SqliteStore::open(&args.db)?);
    store.reinitialize_defaults()?;
    let service = AssessmentService::new(Arc::clone(&store));

    let today = Utc::now().date_naive();
    let mut athletes = 0u32;
    let mut assessments = 0u32;

    for sample in sample_athletes() {
        let athlete = store.create_athlete(AthleteDraft {
            name: sample.name.into(),
            date_of_birth: sample.date_of_birth.parse::<NaiveDate>().ok(),
            height: Some(Quantity {
                value: sample.height_in,
                unit: LengthUnit::In,
            }),
            weight: Some(Quantity {
                value: sample.weight_lbs,
                unit: WeightUnit::Lbs,
            }),
        })?;
        athletes += 1;

        for (months_ago, jump, sprint) in sample.sessions {
            let date = today
                .checked_sub_months(Months::new(months_ago))
                .unwrap_or(today);

            let mut measurements = BTreeMap::new();
            measurements.insert(
                "verticalJump".to_string(),
                MeasurementValue::from_attempts(jump.iter().copied().map(Some).collect()),
            );
            measurements.insert(
                "tenYardSprint".to_string(),
                MeasurementValue::from_attempts(sprint.iter().copied().map(Some).collect()),
            );
            measurements.insert(
                "overheadSquat".to_string(),
                MeasurementValue::sided_score(2, 2),
            );
            measurements.insert(
                "apleyScratch".to_string(),
                MeasurementValue::PassFail {
                    score_left: SideOutcome::Pass,
                    score_right: SideOutcome::Pass,
                    comments: None,
                },
            );

            service.create(AssessmentDraft {
                athlete_id: athlete.id.clone(),
                assessment_date: date,
                measurements,
                general_comments: None,
            })?;
            assessments += 1;
        }
    }

    tracing::info!("seeded {athletes} athletes and {assessments} assessments");
    Ok(())
}
