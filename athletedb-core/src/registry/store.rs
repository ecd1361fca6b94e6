//! Registry persistence over SQLite

use std::collections::HashMap;

use crate::db::{SqliteStore, unix_now};
use crate::error::StoreError;
use crate::validation::ValidationErrors;

use super::defaults::builtin_defaults;
use super::types::{
    AttemptPolicy, Category, Directionality, MeasurementType, MeasurementTypeUpdate, TypeFilter,
    ValueKind,
};

const TYPE_COLUMNS: &str = "id, key, name, category, kind, unit, directionality, is_default, \
     is_active, sidedness, attempts_enabled, max_attempts, min_value, max_value, \
     created_at, updated_at";

/// Registry persistence contract
pub trait MeasurementTypeStore: Send + Sync {
    fn list_types(&self, filter: &TypeFilter) -> Result<Vec<MeasurementType>, StoreError>;
    fn get_type(&self, id: &str) -> Result<Option<MeasurementType>, StoreError>;
    fn get_type_by_key(&self, key: &str) -> Result<Option<MeasurementType>, StoreError>;
    fn create_type(&self, descriptor: MeasurementType) -> Result<MeasurementType, StoreError>;
    fn update_type(
        &self,
        id: &str,
        update: MeasurementTypeUpdate,
    ) -> Result<MeasurementType, StoreError>;
    fn delete_type(&self, id: &str) -> Result<(), StoreError>;

    /// Idempotent upsert of the built-in descriptor set, keyed by `key`.
    /// Custom descriptors are never touched.
    fn reinitialize_defaults(&self) -> Result<(), StoreError>;

    /// Active descriptors keyed by measurement key, for record validation
    fn active_types_by_key(&self) -> Result<HashMap<String, MeasurementType>, StoreError>;
}

impl SqliteStore {
    fn row_to_type(row: &rusqlite::Row) -> Result<MeasurementType, rusqlite::Error> {
        let category: String = row.get(3)?;
        let kind: String = row.get(4)?;
        let directionality: String = row.get(6)?;
        let kind = ValueKind::parse(&kind).unwrap_or(ValueKind::Score);
        Ok(MeasurementType {
            id: row.get(0)?,
            key: row.get(1)?,
            name: row.get(2)?,
            category: Category::parse(&category).unwrap_or(Category::Performance),
            kind,
            unit: row.get(5)?,
            directionality: Directionality::parse(&directionality)
                .unwrap_or_else(|| kind.default_directionality()),
            is_default: row.get(7)?,
            is_active: row.get(8)?,
            sidedness: row.get(9)?,
            attempts: AttemptPolicy {
                enabled: row.get(10)?,
                max_attempts: row.get(11)?,
            },
            min_value: row.get(12)?,
            max_value: row.get(13)?,
            created_at: row.get(14)?,
            updated_at: row.get(15)?,
        })
    }

    fn insert_type(
        conn: &rusqlite::Connection,
        descriptor: &MeasurementType,
    ) -> Result<(), rusqlite::Error> {
        conn.execute(
            "INSERT INTO measurement_types (id, key, name, category, kind, unit, directionality, \
             is_default, is_active, sidedness, attempts_enabled, max_attempts, min_value, \
             max_value, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
            rusqlite::params![
                descriptor.id,
                descriptor.key,
                descriptor.name,
                descriptor.category.as_str(),
                descriptor.kind.as_str(),
                descriptor.unit,
                descriptor.directionality.as_str(),
                descriptor.is_default,
                descriptor.is_active,
                descriptor.sidedness,
                descriptor.attempts.enabled,
                descriptor.attempts.max_attempts,
                descriptor.min_value,
                descriptor.max_value,
                descriptor.created_at,
                descriptor.updated_at,
            ],
        )?;
        Ok(())
    }

    fn persist_type_fields(
        conn: &rusqlite::Connection,
        descriptor: &MeasurementType,
    ) -> Result<usize, rusqlite::Error> {
        conn.execute(
            "UPDATE measurement_types SET
                key = ?2, name = ?3, category = ?4, kind = ?5, unit = ?6,
                directionality = ?7, is_default = ?8, is_active = ?9, sidedness = ?10,
                attempts_enabled = ?11, max_attempts = ?12, min_value = ?13,
                max_value = ?14, updated_at = ?15
             WHERE id = ?1",
            rusqlite::params![
                descriptor.id,
                descriptor.key,
                descriptor.name,
                descriptor.category.as_str(),
                descriptor.kind.as_str(),
                descriptor.unit,
                descriptor.directionality.as_str(),
                descriptor.is_default,
                descriptor.is_active,
                descriptor.sidedness,
                descriptor.attempts.enabled,
                descriptor.attempts.max_attempts,
                descriptor.min_value,
                descriptor.max_value,
                descriptor.updated_at,
            ],
        )
    }
}

impl MeasurementTypeStore for SqliteStore {
    fn list_types(&self, filter: &TypeFilter) -> Result<Vec<MeasurementType>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(category) = filter.category {
            conditions.push(format!("category = ?{}", params.len() + 1));
            params.push(Box::new(category.as_str().to_string()));
        }
        if let Some(is_active) = filter.is_active {
            conditions.push(format!("is_active = ?{}", params.len() + 1));
            params.push(Box::new(is_active));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        let sql = format!(
            "SELECT {TYPE_COLUMNS} FROM measurement_types {where_clause} ORDER BY category, name"
        );

        let mut stmt = conn.prepare(&sql)?;
        let params_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();
        let rows = stmt.query_map(params_refs.as_slice(), Self::row_to_type)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn get_type(&self, id: &str) -> Result<Option<MeasurementType>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TYPE_COLUMNS} FROM measurement_types WHERE id = ?1"
        ))?;
        let mut rows = stmt.query([id])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_type(row)?)),
            None => Ok(None),
        }
    }

    fn get_type_by_key(&self, key: &str) -> Result<Option<MeasurementType>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {TYPE_COLUMNS} FROM measurement_types WHERE key = ?1"
        ))?;
        let mut rows = stmt.query([key])?;
        match rows.next()? {
            Some(row) => Ok(Some(Self::row_to_type(row)?)),
            None => Ok(None),
        }
    }

    fn create_type(&self, descriptor: MeasurementType) -> Result<MeasurementType, StoreError> {
        descriptor.validate()?;
        if self.get_type_by_key(&descriptor.key)?.is_some() {
            return Err(ValidationErrors::single("key", "already exists").into());
        }

        let conn = self.conn.lock().unwrap();
        Self::insert_type(&conn, &descriptor)?;
        Ok(descriptor)
    }

    fn update_type(
        &self,
        id: &str,
        update: MeasurementTypeUpdate,
    ) -> Result<MeasurementType, StoreError> {
        let mut descriptor = self
            .get_type(id)?
            .ok_or_else(|| StoreError::not_found("measurement type", id))?;

        update.apply(&mut descriptor);
        descriptor.updated_at = unix_now();
        descriptor.validate()?;

        // A changed key must not collide with another descriptor
        if let Some(existing) = self.get_type_by_key(&descriptor.key)?
            && existing.id != descriptor.id
        {
            return Err(ValidationErrors::single("key", "already exists").into());
        }

        let conn = self.conn.lock().unwrap();
        Self::persist_type_fields(&conn, &descriptor)?;
        Ok(descriptor)
    }

    fn delete_type(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        let affected = conn.execute("DELETE FROM measurement_types WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(StoreError::not_found("measurement type", id));
        }
        Ok(())
    }

    fn reinitialize_defaults(&self) -> Result<(), StoreError> {
        for builtin in builtin_defaults() {
            match self.get_type_by_key(&builtin.key)? {
                Some(existing) => {
                    // Refresh the descriptor's shape but keep the stored
                    // identity and the admin's active flag
                    let descriptor = MeasurementType {
                        id: existing.id,
                        is_active: existing.is_active,
                        created_at: existing.created_at,
                        updated_at: unix_now(),
                        ..builtin
                    };
                    let conn = self.conn.lock().unwrap();
                    Self::persist_type_fields(&conn, &descriptor)?;
                }
                None => {
                    let conn = self.conn.lock().unwrap();
                    Self::insert_type(&conn, &builtin)?;
                }
            }
        }
        tracing::debug!("built-in measurement types reinitialized");
        Ok(())
    }

    fn active_types_by_key(&self) -> Result<HashMap<String, MeasurementType>, StoreError> {
        let types = self.list_types(&TypeFilter {
            category: None,
            is_active: Some(true),
        })?;
        Ok(types.into_iter().map(|t| (t.key.clone(), t)).collect())
    }
}
