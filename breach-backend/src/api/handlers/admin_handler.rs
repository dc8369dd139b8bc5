// src/api/handlers/admin_handler.rs

use axum::{
    extract::{multipart::Field, Json, Multipart, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch, post},
    Router,
};
use tracing::info;
use validator::Validate;

use crate::api::dto::breach_dto::{
    BreachListQuery, BreachRecordDto, BulkDeleteRequestDto, BulkDeleteResponse,
    CreateBreachRecordForm, UpdateBreachRecordRequest, UpdateStatusRequest,
};
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::extractors::RecordId;
use crate::middleware::auth::{require_admin, AdminSession};
use crate::service::admin_service::UploadedFile;
use crate::types::ApiResponse;
use crate::utils::error_helper::{convert_validation_errors, validation_error};

const PROFILE_PICTURE_FIELD: &str = "profile_picture";
const BREACH_DOCUMENTS_FIELD: &str = "breach_documents";

/// 一覧（フィルタ適用済み、作成日時の降順）
pub async fn list_records_handler(
    State(app_state): State<AppState>,
    Query(query): Query<BreachListQuery>,
) -> AppResult<impl IntoResponse> {
    let filter = query.into_filter()?;
    let records = app_state.admin_service.list(&filter).await?;

    let total = records.len();
    let records: Vec<BreachRecordDto> = records.into_iter().map(Into::into).collect();

    Ok(ApiResponse::list(records, total))
}

pub async fn get_record_handler(
    State(app_state): State<AppState>,
    RecordId(id): RecordId,
) -> AppResult<impl IntoResponse> {
    let record = app_state.admin_service.get(id).await?;
    Ok(ApiResponse::success(BreachRecordDto::from(record)))
}

/// 審査状態の変更
pub async fn update_status_handler(
    State(app_state): State<AppState>,
    AdminSession(admin): AdminSession,
    RecordId(id): RecordId,
    Json(payload): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "admin_handler::update_status"))?;
    let status = payload.parse_status()?;

    let record = app_state.admin_service.change_status(id, status).await?;

    info!(
        admin_id = %admin.user_id,
        record_id = %id,
        status = %status,
        "Breach record status changed"
    );

    Ok(ApiResponse::success(BreachRecordDto::from(record)))
}

/// 全項目の編集
pub async fn update_record_handler(
    State(app_state): State<AppState>,
    AdminSession(admin): AdminSession,
    RecordId(id): RecordId,
    Json(payload): Json<UpdateBreachRecordRequest>,
) -> AppResult<impl IntoResponse> {
    payload
        .validate()
        .map_err(|e| convert_validation_errors(e, "admin_handler::update_record"))?;

    let changes = payload.into_changes()?;
    let record = app_state.admin_service.update(id, changes).await?;

    info!(admin_id = %admin.user_id, record_id = %id, "Breach record updated");

    Ok(ApiResponse::success(BreachRecordDto::from(record)))
}

pub async fn delete_record_handler(
    State(app_state): State<AppState>,
    AdminSession(admin): AdminSession,
    RecordId(id): RecordId,
) -> AppResult<impl IntoResponse> {
    app_state.admin_service.delete(id).await?;

    info!(admin_id = %admin.user_id, record_id = %id, "Breach record deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// 一括削除（表示中の一覧に含まれるIDだけが対象）
pub async fn bulk_delete_handler(
    State(app_state): State<AppState>,
    AdminSession(admin): AdminSession,
    Json(payload): Json<BulkDeleteRequestDto>,
) -> AppResult<impl IntoResponse> {
    let request = payload.into_request()?;
    let result = app_state.admin_service.bulk_delete(request).await?;

    info!(
        admin_id = %admin.user_id,
        deleted_count = result.deleted_count,
        "Breach records bulk deleted"
    );

    Ok(ApiResponse::success(BulkDeleteResponse::from(result)))
}

/// multipartで新規登録（プロフィール画像・関連書類は任意）
pub async fn create_record_handler(
    State(app_state): State<AppState>,
    AdminSession(admin): AdminSession,
    mut multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let mut form = CreateBreachRecordForm::default();
    let mut profile_picture: Option<UploadedFile> = None;
    let mut documents: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read multipart data: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            PROFILE_PICTURE_FIELD => {
                if let Some(file) = read_file_field(field).await? {
                    if !is_image(&file.content_type) {
                        return Err(validation_error(
                            PROFILE_PICTURE_FIELD,
                            "Profile picture must be an image",
                        ));
                    }
                    profile_picture = Some(file);
                }
            }
            // `breach_documents[]` はフォームの配列表記
            BREACH_DOCUMENTS_FIELD | "breach_documents[]" => {
                if let Some(file) = read_file_field(field).await? {
                    documents.push(file);
                }
            }
            _ => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read field '{}': {}", name, e))
                })?;
                if !form.set_field(&name, value) {
                    tracing::debug!(field = %name, "Ignoring unknown multipart field");
                }
            }
        }
    }

    form.validate()
        .map_err(|e| convert_validation_errors(e, "admin_handler::create_record"))?;
    let new_record = form.into_new_record()?;

    let record = app_state
        .admin_service
        .create(new_record, profile_picture, documents)
        .await?;

    info!(
        admin_id = %admin.user_id,
        record_id = %record.id,
        "Breach record created by admin"
    );

    Ok((
        StatusCode::CREATED,
        ApiResponse::success(BreachRecordDto::from(record)).with_message("Breach record created"),
    ))
}

pub fn admin_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/admin/records",
            get(list_records_handler).post(create_record_handler),
        )
        .route("/admin/records/bulk-delete", post(bulk_delete_handler))
        .route(
            "/admin/records/{id}",
            get(get_record_handler)
                .put(update_record_handler)
                .delete(delete_record_handler),
        )
        .route("/admin/records/{id}/status", patch(update_status_handler))
        .route_layer(from_fn_with_state(app_state.clone(), require_admin))
        .with_state(app_state)
}

// --- ヘルパー関数 ---

/// ファイル項目を読み込む。未選択（ファイル名も中身も空）ならNone
async fn read_file_field(field: Field<'_>) -> AppResult<Option<UploadedFile>> {
    let file_name = field.file_name().unwrap_or("").to_string();
    let declared_type = field.content_type().map(str::to_string);

    let data = field
        .bytes()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read file data: {}", e)))?;

    if file_name.is_empty() && data.is_empty() {
        return Ok(None);
    }
    if file_name.is_empty() {
        return Err(AppError::BadRequest("File name is required".to_string()));
    }

    Ok(Some(UploadedFile {
        content_type: resolve_content_type(declared_type.as_deref()),
        file_name,
        data: data.to_vec(),
    }))
}

/// 宣言されたContent-Typeが解釈できなければoctet-streamとして扱う
fn resolve_content_type(declared: Option<&str>) -> String {
    declared
        .and_then(|ct| ct.parse::<mime::Mime>().ok())
        .unwrap_or(mime::APPLICATION_OCTET_STREAM)
        .to_string()
}

fn is_image(content_type: &str) -> bool {
    content_type
        .parse::<mime::Mime>()
        .is_ok_and(|m| m.type_() == mime::IMAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_content_type() {
        assert_eq!(resolve_content_type(Some("image/png")), "image/png");
        assert_eq!(
            resolve_content_type(Some("not a mime")),
            "application/octet-stream"
        );
        assert_eq!(resolve_content_type(None), "application/octet-stream");
    }

    #[test]
    fn test_is_image() {
        assert!(is_image("image/jpeg"));
        assert!(!is_image("application/pdf"));
        assert!(!is_image("garbage"));
    }
}
