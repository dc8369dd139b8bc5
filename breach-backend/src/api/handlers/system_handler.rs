// src/api/handlers/system_handler.rs

use axum::{extract::State, routing::get, Router};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::error::AppResult;
use crate::types::ApiResponse;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub is_production: bool,
    pub timestamp: DateTime<Utc>,
}

pub async fn health_handler(
    State(app_state): State<AppState>,
) -> AppResult<ApiResponse<HealthResponse>> {
    let config = &app_state.config;

    Ok(ApiResponse::success(HealthResponse {
        status: "ok".to_string(),
        environment: config.environment.clone(),
        is_production: config.is_production(),
        timestamp: Utc::now(),
    }))
}

pub fn system_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_state)
}
