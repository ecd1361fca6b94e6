//! Athlete persistence over SQLite

use crate::db::{SqliteStore, unix_now};
use crate::error::StoreError;

use super::types::{
    Athlete, AthleteDraft, AthleteListResult, AthleteQuery, AthleteSummary, AthleteUpdate,
    LengthUnit, Quantity, WeightUnit,
};

const ATHLETE_COLUMNS: &str = "id, name, date_of_birth, height_value, height_unit, \
     weight_value, weight_unit, created_at, updated_at";

/// Athlete persistence contract.
///
/// `delete_athlete_row` removes only the row; the cascade to assessment
/// records lives in the assessment service.
pub trait AthleteStore: Send + Sync {
    fn create_athlete(&self, draft: AthleteDraft) -> Result<Athlete, StoreError>;
    fn get_athlete(&self, id: &str) -> Result<Option<Athlete>, StoreError>;
    fn update_athlete(&self, id: &str, update: AthleteUpdate) -> Result<Athlete, StoreError>;
    fn delete_athlete_row(&self, id: &str) -> Result<(), StoreError>;
    fn list_athletes(&self, query: &AthleteQuery) -> Result<AthleteListResult, StoreError>;
    fn count_athletes(&self) -> Result<u32, StoreError>;
}

impl SqliteStore {
    fn row_to_athlete(row: &rusqlite::Row) -> Result<Athlete, rusqlite::Error> {
        let height_value: Option<f64> = row.get(3)?;
        let height_unit: Option<String> = row.get(4)?;
        let weight_value: Option<f64> = row.get(5)?;
        let weight_unit: Option<String> = row.get(6)?;

        Ok(Athlete {
            id: row.get(0)?,
            name: row.get(1)?,
            date_of_birth: row.get(2)?,
            height: height_value.map(|value| Quantity {
                value,
                unit: height_unit
                    .as_deref()
                    .and_then(LengthUnit::parse)
                    .unwrap_or(LengthUnit::In),
            }),
            weight: weight_value.map(|value| Quantity {
                value,
                unit: weight_unit
                    .as_deref()
                    .and_then(WeightUnit::parse)
                    .unwrap_or(WeightUnit::Lbs),
            }),
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }

    fn persist_athlete(
        conn: &rusqlite::Connection,
        sql: &str,
        athlete: &Athlete,
    ) -> Result<usize, rusqlite::Error> {
        conn.execute(
            sql,
            rusqlite::params![
                athlete.id,
                athlete.name,
                athlete.date_of_birth,
                athlete.height.map(|h| h.value),
                athlete.height.map(|h| h.unit.as_str()),
                athlete.weight.map(|w| w.value),
                athlete.weight.map(|w| w.unit.as_str()),
                athlete.created_at,
                athlete.updated_at,
            ],
        )
    }
}

impl AthleteStore for SqliteStore {
    fn create_athlete(&self, draft: AthleteDraft) -> Result<Athlete, StoreError> {
        draft.validate()?;

        let mut athlete = Athlete::new(draft.name.trim());
        athlete.date_of_birth = draft.date_of_birth;
        athlete.height = draft.height;
        athlete.weight = draft.weight;

        let conn = self.conn.lock().unwrap();
        Self::persist_athlete(
            &conn,
            "INSERT INTO athletes (id, name, date_of_birth, height_value, height_unit, \
             weight_value, weight_unit, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            &athlete,
        )?;
        Ok(athlete)
    }

    fn get_athlete(&self, id: &str) -> Result<Option<Athlete>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {ATHLETE_COLUMNS} FROM athletes WHERE id = ?1"
        ))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_athlete(row)?)),
            None => Ok(None),
        }
    }

    fn update_athlete(&self, id: &str, update: AthleteUpdate) -> Result<Athlete, StoreError> {
        let mut athlete = self
            .get_athlete(id)?
            .ok_or_else(|| StoreError::not_found("athlete", id))?;

        update.apply(&mut athlete);
        if athlete.name.trim().is_empty() {
            return Err(crate::validation::ValidationErrors::single("name", "is required").into());
        }
        athlete.updated_at = unix_now();

        let conn = self.conn.lock().unwrap();
        Self::persist_athlete(
            &conn,
            "UPDATE athletes SET name = ?2, date_of_birth = ?3, height_value = ?4, \
             height_unit = ?5, weight_value = ?6, weight_unit = ?7, created_at = ?8, \
             updated_at = ?9 WHERE id = ?1",
            &athlete,
        )?;
        Ok(athlete)
    }

    fn delete_athlete_row(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute("DELETE FROM athletes WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(StoreError::not_found("athlete", id));
        }
        Ok(())
    }

    fn list_athletes(&self, query: &AthleteQuery) -> Result<AthleteListResult, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref search) = query.search {
            conditions.push(format!("a.name LIKE ?{} ESCAPE '\\'", params.len() + 1));
            let escaped = search.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_");
            params.push(Box::new(format!("%{}%", escaped)));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let total: u32 = {
            let count_sql = format!("SELECT COUNT(*) FROM athletes a {where_clause}");
            let mut stmt = conn.prepare(&count_sql)?;
            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();
            stmt.query_row(params_refs.as_slice(), |row| row.get(0))?
        };

        let select_sql = format!(
            "SELECT a.id, a.name, a.date_of_birth, a.created_at,
                    (SELECT COUNT(*) FROM assessments WHERE athlete_id = a.id) AS assessment_count
             FROM athletes a {where_clause}
             ORDER BY a.name COLLATE NOCASE ASC
             LIMIT ?{} OFFSET ?{}",
            params.len() + 1,
            params.len() + 2
        );
        params.push(Box::new(query.effective_limit() as i64));
        params.push(Box::new(query.offset as i64));

        let athletes = {
            let mut stmt = conn.prepare(&select_sql)?;
            let params_refs: Vec<&dyn rusqlite::ToSql> =
                params.iter().map(|p| p.as_ref()).collect();
            let rows = stmt.query_map(params_refs.as_slice(), |row| {
                let date_of_birth: Option<chrono::NaiveDate> = row.get(2)?;
                Ok(AthleteSummary {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    date_of_birth,
                    age: None,
                    assessment_count: row.get(4)?,
                    created_at: row.get(3)?,
                })
            })?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        // Derive ages once the rows are out of the statement
        let today = chrono::Utc::now().date_naive();
        let athletes = athletes
            .into_iter()
            .map(|mut summary| {
                summary.age = summary
                    .date_of_birth
                    .map(|dob| super::types::age_on(dob, today));
                summary
            })
            .collect();

        Ok(AthleteListResult {
            athletes,
            total,
            limit: query.effective_limit(),
            offset: query.offset,
        })
    }

    fn count_athletes(&self) -> Result<u32, StoreError> {
        let conn = self.conn.lock().unwrap();
        let count: u32 = conn.query_row("SELECT COUNT(*) FROM athletes", [], |row| row.get(0))?;
        Ok(count)
    }
}
