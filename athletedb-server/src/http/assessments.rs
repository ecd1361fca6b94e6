//! Assessment REST endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::Deserialize;

use athletedb_core::{
    Assessment, AssessmentDetail, AssessmentDraft, AssessmentQuery, AssessmentSummary,
};

use crate::error::ApiError;
use crate::state::AppState;

use super::{Envelope, PagedResponse, page_number};

/// Query params for the assessment list
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAssessmentsQuery {
    pub athlete_id: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl From<ListAssessmentsQuery> for AssessmentQuery {
    fn from(q: ListAssessmentsQuery) -> Self {
        Self {
            athlete_id: q.athlete_id,
            start_date: q.start_date,
            end_date: q.end_date,
            limit: q.limit.unwrap_or(10),
            offset: (page_number(q.page) - 1) * q.limit.unwrap_or(10).clamp(1, 100),
        }
    }
}

/// GET /api/assessments
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListAssessmentsQuery>,
) -> Result<Json<PagedResponse<AssessmentSummary>>, ApiError> {
    let page = page_number(query.page);
    let result = state.assessments.list(&query.into())?;
    Ok(Json(PagedResponse::new(
        result.assessments,
        result.total,
        result.limit,
        page,
    )))
}

/// POST /api/assessments
pub async fn create(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<AssessmentDraft>,
) -> Result<(StatusCode, Json<Envelope<Assessment>>), ApiError> {
    let assessment = state.assessments.create(draft)?;
    Ok((StatusCode::CREATED, Json(Envelope::new(assessment))))
}

/// GET /api/assessments/:id
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<AssessmentDetail>>, ApiError> {
    let detail = state.assessments.get(&id)?;
    Ok(Json(Envelope::new(detail)))
}

/// PUT /api/assessments/:id - full replacement
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(draft): Json<AssessmentDraft>,
) -> Result<Json<Envelope<Assessment>>, ApiError> {
    let assessment = state.assessments.update(&id, draft)?;
    Ok(Json(Envelope::new(assessment)))
}

/// DELETE /api/assessments/:id
pub async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Envelope<serde_json::Value>>, ApiError> {
    state.assessments.delete(&id)?;
    Ok(Json(Envelope::new(serde_json::json!({}))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::create_router;
    use athletedb_core::{Athlete, MeasurementTypeStore};
    use axum_test::TestServer;

    fn server() -> TestServer {
        let state = AppState::open_in_memory().unwrap();
        state.store.reinitialize_defaults().unwrap();
        TestServer::new(create_router(Arc::new(state))).unwrap()
    }

    async fn create_athlete(server: &TestServer, name: &str) -> String {
        let body: Envelope<Athlete> = server
            .post("/api/athletes")
            .json(&serde_json::json!({"name": name}))
            .await
            .json();
        body.data.id
    }

    #[tokio::test]
    async fn test_create_derives_best_and_get_populates_athlete() {
        let server = server();
        let jane = create_athlete(&server, "Jane Doe").await;

        let response = server
            .post("/api/assessments")
            .json(&serde_json::json!({
                "athleteId": jane,
                "assessmentDate": "2024-01-01",
                "measurements": {
                    "verticalJump": {
                        "kind": "numeric",
                        "attempts": [27.5, 28.5, 28.0]
                    }
                }
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        let created: serde_json::Value = response.json();
        let id = created["data"]["id"].as_str().unwrap();

        let response = server.get(&format!("/api/assessments/{id}")).await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["data"]["measurements"]["verticalJump"]["value"], 28.5);
        assert_eq!(body["data"]["athlete"]["name"], "Jane Doe");
    }

    #[tokio::test]
    async fn test_create_with_unknown_key_is_400() {
        let server = server();
        let jane = create_athlete(&server, "Jane Doe").await;

        let response = server
            .post("/api/assessments")
            .json(&serde_json::json!({
                "athleteId": jane,
                "assessmentDate": "2024-01-01",
                "measurements": {
                    "madeUpMetric": {"kind": "numeric", "value": 1.0}
                }
            }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: serde_json::Value = response.json();
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .contains("madeUpMetric")
        );
    }

    #[tokio::test]
    async fn test_score_bounds_enforced_over_http() {
        let server = server();
        let jane = create_athlete(&server, "Jane Doe").await;

        let payload = |score: u8| {
            serde_json::json!({
                "athleteId": jane,
                "assessmentDate": "2024-01-01",
                "measurements": {
                    "overheadSquat": {
                        "kind": "score",
                        "scoreLeft": score,
                        "scoreRight": 2
                    }
                }
            })
        };

        server
            .post("/api/assessments")
            .json(&payload(4))
            .await
            .assert_status(StatusCode::BAD_REQUEST);
        server
            .post("/api/assessments")
            .json(&payload(3))
            .await
            .assert_status(StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_list_filters_by_athlete_and_date() {
        let server = server();
        let jane = create_athlete(&server, "Jane Doe").await;
        let john = create_athlete(&server, "John Smith").await;

        for (athlete, date) in [
            (&jane, "2024-01-05"),
            (&jane, "2024-03-10"),
            (&john, "2024-02-01"),
        ] {
            server
                .post("/api/assessments")
                .json(&serde_json::json!({
                    "athleteId": athlete,
                    "assessmentDate": date,
                    "measurements": {}
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server
            .get("/api/assessments")
            .add_query_param("athleteId", &jane)
            .await;
        response.assert_status_ok();
        let body: serde_json::Value = response.json();
        assert_eq!(body["total"], 2);
        assert_eq!(body["data"][0]["assessmentDate"], "2024-03-10");

        let response = server
            .get("/api/assessments")
            .add_query_param("startDate", "2024-02-01")
            .add_query_param("endDate", "2024-02-28")
            .await;
        let body: serde_json::Value = response.json();
        assert_eq!(body["total"], 1);
        assert_eq!(body["data"][0]["athleteName"], "John Smith");
    }

    #[tokio::test]
    async fn test_delete_then_get_is_404() {
        let server = server();
        let jane = create_athlete(&server, "Jane Doe").await;
        let created: serde_json::Value = server
            .post("/api/assessments")
            .json(&serde_json::json!({
                "athleteId": jane,
                "assessmentDate": "2024-01-01",
                "measurements": {}
            }))
            .await
            .json();
        let id = created["data"]["id"].as_str().unwrap();

        server
            .delete(&format!("/api/assessments/{id}"))
            .await
            .assert_status_ok();
        server
            .get(&format!("/api/assessments/{id}"))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_athlete_delete_cascades_over_http() {
        let server = server();
        let jane = create_athlete(&server, "Jane Doe").await;
        for date in ["2024-01-01", "2024-02-01"] {
            server
                .post("/api/assessments")
                .json(&serde_json::json!({
                    "athleteId": jane,
                    "assessmentDate": date,
                    "measurements": {}
                }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        server
            .delete(&format!("/api/athletes/{jane}"))
            .await
            .assert_status_ok();

        let response = server
            .get("/api/assessments")
            .add_query_param("athleteId", &jane)
            .await;
        let body: serde_json::Value = response.json();
        assert_eq!(body["total"], 0);
    }
}
