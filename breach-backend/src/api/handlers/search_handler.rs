// src/api/handlers/search_handler.rs

use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tracing::info;
use validator::Validate;

use crate::api::dto::search_dto::{CompleteRemovalRequest, SearchRequest, SearchResponse};
use crate::api::AppState;
use crate::error::AppResult;
use crate::types::ApiResponse;
use crate::utils::error_helper::convert_validation_errors;

/// 公開検索
pub async fn search_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<SearchRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "search_handler::search"))?;

    let SearchRequest {
        query,
        search_type,
        date_range,
    } = payload;
    let date_range = date_range.into_date_range()?;

    let found = app_state
        .search_service
        .search(&query, search_type, date_range)
        .await?;

    Ok(ApiResponse::success(SearchResponse::from(found)))
}

/// 削除依頼の支払い案内（表示のみ）
pub async fn payment_prompt_handler(
    State(app_state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    Ok(ApiResponse::success(
        app_state.removal_service.payment_prompt(),
    ))
}

/// 支払い完了の申告を受けて削除依頼を記録する
pub async fn complete_removal_handler(
    State(app_state): State<AppState>,
    Json(payload): Json<CompleteRemovalRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "search_handler::complete_removal"))?;

    let receipt = app_state
        .removal_service
        .complete(&payload.email, &payload.phone)
        .await?;

    info!(
        updated_records = receipt.updated_records,
        "Removal request submitted"
    );

    Ok(ApiResponse::success(receipt).with_message("Removal request submitted"))
}

pub fn search_router(app_state: AppState) -> Router {
    Router::new()
        .route("/search", post(search_handler))
        .route("/removal/payment", get(payment_prompt_handler))
        .route("/removal/complete", post(complete_removal_handler))
        .with_state(app_state)
}
