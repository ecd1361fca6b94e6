//! Assessment persistence over SQLite
//!
//! Measurements are stored as one JSON document per record, mirroring the
//! schema-less map the API exposes; everything the engine filters or sorts
//! on (athlete, date) lives in real columns.

use chrono::NaiveDate;

use crate::db::SqliteStore;
use crate::error::StoreError;

use super::query::{AssessmentListResult, AssessmentQuery};
use super::types::{Assessment, AssessmentSummary};

const ASSESSMENT_COLUMNS: &str =
    "id, athlete_id, assessment_date, measurements, general_comments, created_at, updated_at";

/// Assessment persistence contract
pub trait AssessmentStore: Send + Sync {
    fn insert_assessment(&self, assessment: &Assessment) -> Result<(), StoreError>;
    fn get_assessment(&self, id: &str) -> Result<Option<Assessment>, StoreError>;
    /// Full replacement by id
    fn replace_assessment(&self, assessment: &Assessment) -> Result<(), StoreError>;
    fn delete_assessment(&self, id: &str) -> Result<(), StoreError>;
    fn list_assessments(&self, query: &AssessmentQuery)
    -> Result<AssessmentListResult, StoreError>;

    /// Remove every record for an athlete, returning how many went
    fn delete_assessments_for_athlete(&self, athlete_id: &str) -> Result<u32, StoreError>;
    /// All records for an athlete, newest first
    fn assessments_for_athlete(&self, athlete_id: &str) -> Result<Vec<Assessment>, StoreError>;
    fn latest_assessment_for_athlete(
        &self,
        athlete_id: &str,
    ) -> Result<Option<Assessment>, StoreError>;
    /// All records in the inclusive date range, oldest first
    fn assessments_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Assessment>, StoreError>;
    fn count_assessments(&self) -> Result<u32, StoreError>;
    fn count_assessments_since(&self, date: NaiveDate) -> Result<u32, StoreError>;
    /// Most recent records with athlete names populated
    fn recent_assessments(&self, limit: u32) -> Result<Vec<AssessmentSummary>, StoreError>;
}

impl SqliteStore {
    fn row_to_assessment(row: &rusqlite::Row) -> Result<(Assessment, String), rusqlite::Error> {
        // Returns the raw measurements JSON alongside so callers decode it
        // outside the rusqlite error domain
        let measurements_json: String = row.get(3)?;
        Ok((
            Assessment {
                id: row.get(0)?,
                athlete_id: row.get(1)?,
                assessment_date: row.get(2)?,
                measurements: Default::default(),
                general_comments: row.get(4)?,
                created_at: row.get(5)?,
                updated_at: row.get(6)?,
            },
            measurements_json,
        ))
    }

    fn decode_rows(
        rows: Vec<(Assessment, String)>,
    ) -> Result<Vec<Assessment>, StoreError> {
        rows.into_iter()
            .map(|(mut assessment, json)| {
                assessment.measurements = serde_json::from_str(&json)?;
                Ok(assessment)
            })
            .collect()
    }
}

impl AssessmentStore for SqliteStore {
    fn insert_assessment(&self, assessment: &Assessment) -> Result<(), StoreError> {
        let measurements = serde_json::to_string(&assessment.measurements)?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO assessments (id, athlete_id, assessment_date, measurements, \
             general_comments, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                assessment.id,
                assessment.athlete_id,
                assessment.assessment_date,
                measurements,
                assessment.general_comments,
                assessment.created_at,
                assessment.updated_at,
            ],
        )?;
        Ok(())
    }

    fn get_assessment(&self, id: &str) -> Result<Option<Assessment>, StoreError> {
        let row = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare(&format!(
                "SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE id = ?1"
            ))?;
            let mut rows = stmt.query([id])?;
            match rows.next()? {
                Some(row) => Some(Self::row_to_assessment(row)?),
                None => None,
            }
        };
        match row {
            Some(pair) => Ok(Self::decode_rows(vec![pair])?.pop()),
            None => Ok(None),
        }
    }

    fn replace_assessment(&self, assessment: &Assessment) -> Result<(), StoreError> {
        let measurements = serde_json::to_string(&assessment.measurements)?;
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "UPDATE assessments SET athlete_id = ?2, assessment_date = ?3, measurements = ?4, \
             general_comments = ?5, updated_at = ?6 WHERE id = ?1",
            rusqlite::params![
                assessment.id,
                assessment.athlete_id,
                assessment.assessment_date,
                measurements,
                assessment.general_comments,
                assessment.updated_at,
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("assessment", &assessment.id));
        }
        Ok(())
    }

    fn delete_assessment(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute("DELETE FROM assessments WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(StoreError::not_found("assessment", id));
        }
        Ok(())
    }

    fn list_assessments(
        &self,
        query: &AssessmentQuery,
    ) -> Result<AssessmentListResult, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref athlete_id) = query.athlete_id {
            conditions.push(format!("s.athlete_id = ?{}", params.len() + 1));
            params.push(Box::new(athlete_id.clone()));
        }
        if let Some(start) = query.start_date {
            conditions.push(format!("s.assessment_date >= ?{}", params.len() + 1));
            params.push(Box::new(start));
        }
        if let Some(end) = query.end_date {
            conditions.push(format!("s.assessment_date <= ?{}", params.len() + 1));
            params.push(Box::new(end));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let total: u32 = {
            let count_sql = format!("SELECT COUNT(*) FROM assessments s {where_clause}");
            let mut stmt = conn.prepare(&count_sql)?;
            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();
            stmt.query_row(params_refs.as_slice(), |row| row.get(0))?
        };

        let select_sql = format!(
            "SELECT s.id, s.athlete_id, a.name, s.assessment_date, s.measurements, s.created_at
             FROM assessments s LEFT JOIN athletes a ON a.id = s.athlete_id
             {where_clause}
             ORDER BY s.assessment_date DESC, s.created_at DESC
             LIMIT ?{} OFFSET ?{}",
            params.len() + 1,
            params.len() + 2
        );
        params.push(Box::new(query.effective_limit() as i64));
        params.push(Box::new(query.offset as i64));

        let assessments = {
            let mut stmt = conn.prepare(&select_sql)?;
            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();
            let rows = stmt.query_map(params_refs.as_slice(), Self::row_to_summary)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        Ok(AssessmentListResult {
            assessments,
            total,
            limit: query.effective_limit(),
            offset: query.offset,
        })
    }

    fn delete_assessments_for_athlete(&self, athlete_id: &str) -> Result<u32, StoreError> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute(
            "DELETE FROM assessments WHERE athlete_id = ?1",
            [athlete_id],
        )?;
        Ok(affected as u32)
    }

    fn assessments_for_athlete(&self, athlete_id: &str) -> Result<Vec<Assessment>, StoreError> {
        let rows = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare(&format!(
                "SELECT {ASSESSMENT_COLUMNS} FROM assessments WHERE athlete_id = ?1
                 ORDER BY assessment_date DESC, created_at DESC"
            ))?;
            let rows = stmt.query_map([athlete_id], Self::row_to_assessment)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        Self::decode_rows(rows)
    }

    fn latest_assessment_for_athlete(
        &self,
        athlete_id: &str,
    ) -> Result<Option<Assessment>, StoreError> {
        Ok(self.assessments_for_athlete(athlete_id)?.into_iter().next())
    }

    fn assessments_in_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<Assessment>, StoreError> {
        let rows = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn.prepare(&format!(
                "SELECT {ASSESSMENT_COLUMNS} FROM assessments
                 WHERE assessment_date >= ?1 AND assessment_date <= ?2
                 ORDER BY assessment_date ASC, created_at ASC"
            ))?;
            let rows = stmt.query_map(rusqlite::params![start, end], Self::row_to_assessment)?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        Self::decode_rows(rows)
    }

    fn count_assessments(&self) -> Result<u32, StoreError> {
        let conn = self.conn.lock().unwrap();
        let count: u32 =
            conn.query_row("SELECT COUNT(*) FROM assessments", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_assessments_since(&self, date: NaiveDate) -> Result<u32, StoreError> {
        let conn = self.conn.lock().unwrap();
        let count: u32 = conn.query_row(
            "SELECT COUNT(*) FROM assessments WHERE assessment_date >= ?1",
            [date],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn recent_assessments(&self, limit: u32) -> Result<Vec<AssessmentSummary>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT s.id, s.athlete_id, a.name, s.assessment_date, s.measurements, s.created_at
             FROM assessments s LEFT JOIN athletes a ON a.id = s.athlete_id
             ORDER BY s.assessment_date DESC, s.created_at DESC
             LIMIT ?1",
        )?;
        let rows = stmt.query_map([limit], Self::row_to_summary)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }
}

impl SqliteStore {
    fn row_to_summary(row: &rusqlite::Row) -> Result<AssessmentSummary, rusqlite::Error> {
        let measurements_json: String = row.get(4)?;
        let measurement_count = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(
            &measurements_json,
        )
        .map(|m| m.len() as u32)
        .unwrap_or(0);

        Ok(AssessmentSummary {
            id: row.get(0)?,
            athlete_id: row.get(1)?,
            athlete_name: row.get(2)?,
            assessment_date: row.get(3)?,
            measurement_count,
            created_at: row.get(5)?,
        })
    }
}
