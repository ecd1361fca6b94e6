//! Athlete REST endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use athletedb_core::{
    Athlete, AthleteDraft, AthleteQuery, AthleteStats, AthleteStore, AthleteSummary,
    AthleteUpdate, AssessmentQuery, AssessmentSummary, TrendSample,
};

use crate::error::ApiError;
use crate::state::AppState;

use super::{Envelope, PagedResponse, page_number};

/// Query params for the athlete list
#[derive(Debug, Deserialize)]
pub struct ListAthletesQuery {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// GET /api/athletes
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAthletesQuery>,
) -> Result<Json<PagedResponse<AthleteSummary>>, ApiError> {
    let page = page_number(query.page);
    let mut core_query = AthleteQuery::new();
    core_query.search = query.search;
    core_query.limit = query.limit.unwrap_or(10);
    core_query.offset = (page - 1) * core_query.effective_limit();

    let result = state.store.list_athletes(&core_query)?;
    Ok(Json(PagedResponse::new(
        result.athletes,
        result.total,
        result.limit,
        page,
    )))
}

/// POST /api/athletes
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<AthleteDraft>,
) -> Result<(StatusCode, Json<Envelope<Athlete>>), ApiError> {
    let athlete = state.store.create_athlete(draft)?;
    Ok((StatusCode::CREATED, Json(Envelope::new(athlete))))
}

/// Athlete detail with derived age and their assessment history
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AthleteResponse {
    #[serde(flatten)]
    pub athlete: Athlete,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<i32>,
    pub assessments: Vec<AssessmentSummary>,
}

/// GET /api/athletes/:id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<AthleteResponse>>, ApiError> {
    let athlete = state
        .store
        .get_athlete(&id)?
        .ok_or_else(|| athletedb_core::StoreError::not_found("athlete", &id))?;

    let mut query = AssessmentQuery::new();
    query.athlete_id = Some(id);
    query.limit = 100;
    let assessments = state.assessments.list(&query)?.assessments;

    Ok(Json(Envelope::new(AthleteResponse {
        age: athlete.age(),
        athlete,
        assessments,
    })))
}

/// PUT /api/athletes/:id
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(body): Json<AthleteUpdate>,
) -> Result<Json<Envelope<Athlete>>, ApiError> {
    let athlete = state.store.update_athlete(&id, body)?;
    Ok(Json(Envelope::new(athlete)))
}

/// DELETE /api/athletes/:id - cascades to the athlete's assessment records
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    state.assessments.delete_athlete(&id)?;
    Ok(Json(Envelope::new(serde_json::json!({}))))
}

/// GET /api/athletes/:id/statistics
pub async fn statistics(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<AthleteStats>>, ApiError> {
    let stats = state.stats.athlete_stats(&id)?;
    Ok(Json(Envelope::new(stats)))
}

/// Query params for per-athlete trends
#[derive(Debug, Deserialize)]
pub struct TrendsQuery {
    pub metric: Option<String>,
}

/// GET /api/athletes/:id/trends?metric=
pub async fn trends(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Query(query): Query<TrendsQuery>,
) -> Result<Json<Envelope<Vec<TrendSample>>>, ApiError> {
    let metric = query
        .metric
        .ok_or_else(|| ApiError::bad_request("metric", "is required"))?;
    let samples = state.stats.athlete_trend(&id, &metric)?;
    Ok(Json(Envelope::new(samples)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::create_router;
    use athletedb_core::MeasurementTypeStore;
    use axum_test::TestServer;

    fn server() -> TestServer {
        let state = AppState::open_in_memory().unwrap();
        state.store.reinitialize_defaults().unwrap();
        TestServer::new(create_router(Arc::new(state))).unwrap()
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let server = server();

        let response = server
            .post("/api/athletes")
            .json(&serde_json::json!({
                "name": "Jane Doe",
                "dateOfBirth": "2008-06-15",
                "height": {"value": 66.0, "unit": "in"},
                "weight": {"value": 140.0, "unit": "lbs"}
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let body: Envelope<Athlete> = response.json();
        assert_eq!(body.data.name, "Jane Doe");

        let response = server.get(&format!("/api/athletes/{}", body.data.id)).await;
        response.assert_status_ok();
        let detail: serde_json::Value = response.json();
        assert_eq!(detail["data"]["name"], "Jane Doe");
        assert!(detail["data"]["age"].is_number());
        assert!(detail["data"]["assessments"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_without_name_is_400() {
        let server = server();
        let response = server
            .post("/api/athletes")
            .json(&serde_json::json!({"name": ""}))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_get_missing_is_404() {
        let server = server();
        let response = server.get("/api/athletes/nope").await;
        response.assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_list_with_search_and_paging() {
        let server = server();
        for name in ["Jane Doe", "Janet Jones", "John Smith"] {
            server
                .post("/api/athletes")
                .json(&serde_json::json!({"name": name}))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get("/api/athletes")
            .add_query_param("search", "jane")
            .add_query_param("limit", "1")
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["total"], 2);
        assert_eq!(body["count"], 1);
        assert_eq!(body["totalPages"], 2);
    }

    #[tokio::test]
    async fn test_trends_requires_metric() {
        let server = server();
        let created: Envelope<Athlete> = server
            .post("/api/athletes")
            .json(&serde_json::json!({"name": "Jane Doe"}))
            .await
            .json();

        let response = server
            .get(&format!("/api/athletes/{}/trends", created.data.id))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
    }
}
