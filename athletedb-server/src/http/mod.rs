//! HTTP routing

mod api;
mod assessments;
mod athletes;
mod measurement_types;
mod statistics;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;

use crate::AppState;

pub use api::HealthResponse;

/// 1-based page number from an optional query param
pub(crate) fn page_number(page: Option<u32>) -> u32 {
    page.unwrap_or(1).max(1)
}

/// Envelope for successful responses
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Paged list response, field-compatible with the original API
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PagedResponse<T> {
    pub success: bool,
    /// Items on this page
    pub count: usize,
    /// Items matching the filter overall
    pub total: u32,
    pub total_pages: u32,
    pub current_page: u32,
    pub data: Vec<T>,
}

impl<T> PagedResponse<T> {
    pub fn new(data: Vec<T>, total: u32, limit: u32, page: u32) -> Self {
        Self {
            success: true,
            count: data.len(),
            total,
            total_pages: total.div_ceil(limit.max(1)),
            current_page: page,
            data,
        }
    }
}

/// Create the HTTP router with all routes configured
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(api::health))
        .route(
            "/api/athletes",
            get(athletes::list).post(athletes::create),
        )
        .route(
            "/api/athletes/:id",
            get(athletes::get)
                .put(athletes::update)
                .delete(athletes::remove),
        )
        .route("/api/athletes/:id/statistics", get(athletes::statistics))
        .route("/api/athletes/:id/trends", get(athletes::trends))
        .route(
            "/api/assessments",
            get(assessments::list).post(assessments::create),
        )
        .route(
            "/api/assessments/:id",
            get(assessments::get)
                .put(assessments::update)
                .delete(assessments::remove),
        )
        .route(
            "/api/measurement-types",
            get(measurement_types::list).post(measurement_types::create),
        )
        .route(
            "/api/measurement-types/reinitialize",
            post(measurement_types::reinitialize),
        )
        .route(
            "/api/measurement-types/:id",
            put(measurement_types::update).delete(measurement_types::remove),
        )
        .route("/api/statistics/dashboard", get(statistics::dashboard))
        .route("/api/statistics/trends", get(statistics::trends))
        .route("/api/statistics/compare", get(statistics::compare))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
