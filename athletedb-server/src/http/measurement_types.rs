//! Measurement type REST endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use athletedb_core::{
    Category, MeasurementType, MeasurementTypeDraft, MeasurementTypeStore, MeasurementTypeUpdate,
    TypeFilter,
};

use crate::error::ApiError;
use crate::state::AppState;

use super::Envelope;

/// Query params for the descriptor list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTypesQuery {
    pub category: Option<Category>,
    pub is_active: Option<bool>,
}

/// GET /api/measurement-types
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListTypesQuery>,
) -> Result<Json<Envelope<Vec<MeasurementType>>>, ApiError> {
    let types = state.store.list_types(&TypeFilter {
        category: query.category,
        is_active: query.is_active,
    })?;
    Ok(Json(Envelope::new(types)))
}

/// POST /api/measurement-types
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<MeasurementTypeDraft>,
) -> Result<(StatusCode, Json<Envelope<MeasurementType>>), ApiError> {
    let descriptor = state.store.create_type(draft.into_type())?;
    Ok((StatusCode::CREATED, Json(Envelope::new(descriptor))))
}

/// PUT /api/measurement-types/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<MeasurementTypeUpdate>,
) -> Result<Json<Envelope<MeasurementType>>, ApiError> {
    let descriptor = state.store.update_type(&id, body)?;
    Ok(Json(Envelope::new(descriptor)))
}

/// DELETE /api/measurement-types/:id
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    state.store.delete_type(&id)?;
    Ok(Json(Envelope::new(serde_json::json!({}))))
}

/// POST /api/measurement-types/reinitialize
pub async fn reinitialize(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    state.store.reinitialize_defaults()?;
    Ok(Json(Envelope::new(serde_json::json!({
        "message": "Default measurements reinitialized"
    }))))
}
