//! Assessment business logic
//!
//! The service front-ends the raw stores: every write is validated against
//! the active measurement registry first (batch validation, no partial
//! writes), derived bests are recomputed, and athlete deletion runs the
//! application-level cascade.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::athlete::AthleteStore;
use crate::db::unix_now;
use crate::error::StoreError;
use crate::measurement::{MeasurementValue, validate_value};
use crate::registry::MeasurementTypeStore;
use crate::validation::ValidationErrors;

use super::query::{AssessmentListResult, AssessmentQuery};
use super::store::AssessmentStore;
use super::types::{Assessment, AssessmentDetail, AssessmentDraft, AthleteRef};

/// Validates and persists assessment records against the registry
pub struct AssessmentService<S> {
    store: Arc<S>,
}

impl<S> AssessmentService<S>
where
    S: MeasurementTypeStore + AthleteStore + AssessmentStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Create a record. Every measurement key must resolve to an active
    /// descriptor and every value must pass its descriptor's rules; all
    /// failures are reported together.
    pub fn create(&self, draft: AssessmentDraft) -> Result<Assessment, StoreError> {
        if self.store.get_athlete(&draft.athlete_id)?.is_none() {
            return Err(StoreError::not_found("athlete", &draft.athlete_id));
        }

        let measurements = self.validate_and_normalize(draft.measurements)?;
        let now = unix_now();
        let assessment = Assessment {
            id: uuid::Uuid::new_v4().to_string(),
            athlete_id: draft.athlete_id,
            assessment_date: draft.assessment_date,
            measurements,
            general_comments: draft.general_comments,
            created_at: now,
            updated_at: now,
        };
        self.store.insert_assessment(&assessment)?;
        Ok(assessment)
    }

    /// Replace a record wholesale. Partial measurement updates are not
    /// supported; the submitted map is the new map.
    pub fn update(&self, id: &str, draft: AssessmentDraft) -> Result<Assessment, StoreError> {
        let existing = self
            .store
            .get_assessment(id)?
            .ok_or_else(|| StoreError::not_found("assessment", id))?;
        if self.store.get_athlete(&draft.athlete_id)?.is_none() {
            return Err(StoreError::not_found("athlete", &draft.athlete_id));
        }

        let measurements = self.validate_and_normalize(draft.measurements)?;
        let assessment = Assessment {
            id: existing.id,
            athlete_id: draft.athlete_id,
            assessment_date: draft.assessment_date,
            measurements,
            general_comments: draft.general_comments,
            created_at: existing.created_at,
            updated_at: unix_now(),
        };
        self.store.replace_assessment(&assessment)?;
        Ok(assessment)
    }

    /// Fetch a record with its athlete's display fields inlined. A dangling
    /// athlete reference degrades to an absent athlete block.
    pub fn get(&self, id: &str) -> Result<AssessmentDetail, StoreError> {
        let assessment = self
            .store
            .get_assessment(id)?
            .ok_or_else(|| StoreError::not_found("assessment", id))?;
        let athlete = self.store.get_athlete(&assessment.athlete_id)?;
        Ok(AssessmentDetail {
            athlete: athlete.as_ref().map(AthleteRef::from_athlete),
            assessment,
        })
    }

    pub fn list(&self, query: &AssessmentQuery) -> Result<AssessmentListResult, StoreError> {
        self.store.list_assessments(query)
    }

    /// Delete a single record; the athlete and other records are untouched
    pub fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.store.delete_assessment(id)
    }

    /// Delete an athlete and every record referencing them.
    ///
    /// Two sequential steps, records first. There is no transaction across
    /// them: a failure after the first step leaves an athlete without
    /// records rather than records without an athlete.
    pub fn delete_athlete(&self, id: &str) -> Result<(), StoreError> {
        if self.store.get_athlete(id)?.is_none() {
            return Err(StoreError::not_found("athlete", id));
        }
        let removed = self.store.delete_assessments_for_athlete(id)?;
        if removed > 0 {
            tracing::info!(athlete_id = id, removed, "cascade-deleted assessment records");
        }
        self.store.delete_athlete_row(id)
    }

    fn validate_and_normalize(
        &self,
        measurements: BTreeMap<String, MeasurementValue>,
    ) -> Result<BTreeMap<String, MeasurementValue>, StoreError> {
        let registry = self.store.active_types_by_key()?;

        let mut errors = ValidationErrors::new();
        let mut normalized = BTreeMap::new();
        for (key, mut value) in measurements {
            match registry.get(&key) {
                None => errors.push(&key, "unknown or inactive measurement key"),
                Some(descriptor) => {
                    let value_errors = validate_value(&key, &value, descriptor);
                    if value_errors.is_empty() {
                        value.normalize(descriptor.directionality);
                        normalized.insert(key, value);
                    } else {
                        errors.extend(value_errors);
                    }
                }
            }
        }

        errors.into_result()?;
        Ok(normalized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::athlete::AthleteDraft;
    use crate::db::SqliteStore;
    use crate::measurement::SideOutcome;
    use crate::registry::MeasurementTypeUpdate;

    fn service() -> AssessmentService<SqliteStore> {
        let store = SqliteStore::open_in_memory().unwrap();
        store.reinitialize_defaults().unwrap();
        AssessmentService::new(Arc::new(store))
    }

    fn create_athlete(service: &AssessmentService<SqliteStore>, name: &str) -> String {
        service
            .store
            .create_athlete(AthleteDraft {
                name: name.into(),
                ..Default::default()
            })
            .unwrap()
            .id
    }

    fn jump_draft(athlete_id: &str, attempts: Vec<Option<f64>>) -> AssessmentDraft {
        let mut measurements = BTreeMap::new();
        measurements.insert(
            "verticalJump".to_string(),
            MeasurementValue::from_attempts(attempts),
        );
        AssessmentDraft {
            athlete_id: athlete_id.into(),
            assessment_date: "2024-01-01".parse().unwrap(),
            measurements,
            general_comments: None,
        }
    }

    #[test]
    fn test_create_derives_best_value() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");

        let created = service
            .create(jump_draft(&jane, vec![Some(27.5), Some(28.5), Some(28.0)]))
            .unwrap();

        let detail = service.get(&created.id).unwrap();
        assert_eq!(
            detail.assessment.measurements["verticalJump"].metric_value(),
            Some(28.5)
        );
        assert_eq!(detail.athlete.unwrap().name, "Jane Doe");
    }

    #[test]
    fn test_create_derives_min_for_sprint() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");

        let mut measurements = BTreeMap::new();
        measurements.insert(
            "tenYardSprint".to_string(),
            MeasurementValue::from_attempts(vec![Some(1.70), Some(1.60)]),
        );
        let created = service
            .create(AssessmentDraft {
                athlete_id: jane,
                assessment_date: "2024-01-01".parse().unwrap(),
                measurements,
                general_comments: None,
            })
            .unwrap();

        assert_eq!(
            created.measurements["tenYardSprint"].metric_value(),
            Some(1.60)
        );
    }

    #[test]
    fn test_create_rejects_unknown_key() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");

        let mut draft = jump_draft(&jane, vec![Some(28.0)]);
        draft.measurements.insert(
            "madeUpMetric".to_string(),
            MeasurementValue::from_attempts(vec![Some(1.0)]),
        );

        let err = service.create(draft).unwrap_err();
        let StoreError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.errors.iter().any(|e| e.field == "madeUpMetric"));
    }

    #[test]
    fn test_create_rejects_inactive_key() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");

        let jump = service
            .store
            .get_type_by_key("verticalJump")
            .unwrap()
            .unwrap();
        service
            .store
            .update_type(
                &jump.id,
                MeasurementTypeUpdate {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .unwrap();

        let err = service.create(jump_draft(&jane, vec![Some(28.0)])).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_create_score_bounds() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");

        let mut measurements = BTreeMap::new();
        measurements.insert(
            "overheadSquat".to_string(),
            MeasurementValue::sided_score(4, 2),
        );
        let draft = AssessmentDraft {
            athlete_id: jane.clone(),
            assessment_date: "2024-01-01".parse().unwrap(),
            measurements: measurements.clone(),
            general_comments: None,
        };
        assert!(matches!(
            service.create(draft).unwrap_err(),
            StoreError::Validation(_)
        ));

        measurements.insert(
            "overheadSquat".to_string(),
            MeasurementValue::sided_score(3, 2),
        );
        let draft = AssessmentDraft {
            athlete_id: jane,
            assessment_date: "2024-01-01".parse().unwrap(),
            measurements,
            general_comments: None,
        };
        service.create(draft).unwrap();
    }

    #[test]
    fn test_create_batches_all_failures() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");

        let mut measurements = BTreeMap::new();
        measurements.insert(
            "overheadSquat".to_string(),
            MeasurementValue::sided_score(4, 5),
        );
        measurements.insert(
            "madeUpMetric".to_string(),
            MeasurementValue::from_attempts(vec![Some(1.0)]),
        );
        let err = service
            .create(AssessmentDraft {
                athlete_id: jane,
                assessment_date: "2024-01-01".parse().unwrap(),
                measurements,
                general_comments: None,
            })
            .unwrap_err();

        let StoreError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert!(errors.len() >= 3, "range x2 plus unknown key: {errors}");
    }

    #[test]
    fn test_create_for_missing_athlete_is_not_found() {
        let service = service();
        let err = service
            .create(jump_draft("missing", vec![Some(28.0)]))
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_nothing_persisted_when_validation_fails() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");

        let mut draft = jump_draft(&jane, vec![Some(28.0)]);
        draft
            .measurements
            .insert("bogus".to_string(), MeasurementValue::from_attempts(vec![]));
        let _ = service.create(draft);

        assert_eq!(service.store.count_assessments().unwrap(), 0);
    }

    #[test]
    fn test_update_replaces_measurement_map() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");
        let created = service
            .create(jump_draft(&jane, vec![Some(27.5), Some(28.5)]))
            .unwrap();

        let mut measurements = BTreeMap::new();
        measurements.insert(
            "apleyScratch".to_string(),
            MeasurementValue::PassFail {
                score_left: SideOutcome::Pass,
                score_right: SideOutcome::Fail,
                comments: None,
            },
        );
        let updated = service
            .update(
                &created.id,
                AssessmentDraft {
                    athlete_id: jane,
                    assessment_date: "2024-02-01".parse().unwrap(),
                    measurements,
                    general_comments: Some("re-screen".into()),
                },
            )
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(!updated.measurements.contains_key("verticalJump"));
        assert!(updated.measurements.contains_key("apleyScratch"));
    }

    #[test]
    fn test_delete_athlete_cascades() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");
        let john = create_athlete(&service, "John Smith");
        for date in ["2024-01-01", "2024-02-01", "2024-03-01"] {
            let mut draft = jump_draft(&jane, vec![Some(28.0)]);
            draft.assessment_date = date.parse().unwrap();
            service.create(draft).unwrap();
        }
        service.create(jump_draft(&john, vec![Some(30.0)])).unwrap();

        service.delete_athlete(&jane).unwrap();

        assert!(service.store.get_athlete(&jane).unwrap().is_none());
        assert!(service.store.assessments_for_athlete(&jane).unwrap().is_empty());
        // Other athletes' records survive
        assert_eq!(service.store.count_assessments().unwrap(), 1);
    }

    #[test]
    fn test_get_with_dangling_athlete_degrades() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");
        let created = service.create(jump_draft(&jane, vec![Some(28.0)])).unwrap();

        // Remove only the athlete row, leaving the record orphaned
        service.store.delete_athlete_row(&jane).unwrap();

        let detail = service.get(&created.id).unwrap();
        assert!(detail.athlete.is_none());
        assert_eq!(detail.assessment.id, created.id);
    }

    #[test]
    fn test_historical_record_survives_descriptor_deletion() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");
        let created = service.create(jump_draft(&jane, vec![Some(28.0)])).unwrap();

        let jump = service
            .store
            .get_type_by_key("verticalJump")
            .unwrap()
            .unwrap();
        service.store.delete_type(&jump.id).unwrap();

        // The stored key still reads back; display degrades gracefully
        let detail = service.get(&created.id).unwrap();
        assert!(detail.assessment.measurements.contains_key("verticalJump"));

        // But new records can no longer use it
        let err = service.create(jump_draft(&jane, vec![Some(29.0)])).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
    }

    #[test]
    fn test_list_defaults_newest_first() {
        let service = service();
        let jane = create_athlete(&service, "Jane Doe");
        for date in ["2024-01-01", "2024-03-01", "2024-02-01"] {
            let mut draft = jump_draft(&jane, vec![Some(28.0)]);
            draft.assessment_date = date.parse().unwrap();
            service.create(draft).unwrap();
        }

        let result = service.list(&AssessmentQuery::new()).unwrap();
        let dates: Vec<_> = result
            .assessments
            .iter()
            .map(|a| a.assessment_date.to_string())
            .collect();
        assert_eq!(dates, vec!["2024-03-01", "2024-02-01", "2024-01-01"]);
    }
}
