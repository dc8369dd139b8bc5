// src/utils/error_helper.rs

//! エラーハンドリングの統一化ヘルパー
//!
//! サービス層とハンドラー層で共通して使うエラー生成処理。
//! どの関数も返す前に tracing でログを残す。

use crate::error::AppError;
use tracing::{error, warn};
use validator::ValidationErrors;

// =============================================================================
// バリデーションエラー
// =============================================================================

/// validatorのValidationErrorsを "field: message" 形式のAppErrorに変換
pub fn convert_validation_errors(validation_errors: ValidationErrors, context: &str) -> AppError {
    warn!(
        context = %context,
        error_count = validation_errors.field_errors().len(),
        "Validation failed"
    );

    let errors: Vec<String> = validation_errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map_or_else(|| "Invalid value".to_string(), |cow| cow.to_string());
                format!("{}: {}", field, message)
            })
        })
        .collect();

    AppError::ValidationErrors(errors)
}

/// 単一のバリデーションエラーメッセージを生成
pub fn validation_error(field: &str, message: &str) -> AppError {
    AppError::ValidationError(format!("{}: {}", field, message))
}

// =============================================================================
// ログ付きエラー変換
// =============================================================================

/// 内部サーバーエラー（詳細はログのみ、クライアントには user_message）
pub fn internal_server_error<E: std::fmt::Display>(
    error: E,
    context: &str,
    user_message: &str,
) -> AppError {
    error!(
        error = %error,
        context = %context,
        "Internal server error occurred"
    );
    AppError::InternalServerError(user_message.to_string())
}

/// レコードストアやオブジェクトストレージなど外部依存の失敗
pub fn external_service_error<E: std::fmt::Display>(
    error: E,
    context: &str,
    user_message: &str,
) -> AppError {
    error!(
        error = %error,
        context = %context,
        "External service call failed"
    );
    AppError::ExternalServiceError(user_message.to_string())
}

pub fn unauthorized_error(message: &str, context: &str) -> AppError {
    warn!(
        context = %context,
        message = %message,
        "Unauthorized access attempt"
    );
    AppError::Unauthorized(message.to_string())
}

pub fn forbidden_error(message: &str, context: &str, user_id: Option<&str>) -> AppError {
    warn!(
        context = %context,
        message = %message,
        user_id = user_id.unwrap_or("unknown"),
        "Forbidden access attempt"
    );
    AppError::Forbidden(message.to_string())
}

pub fn not_found_error(resource: &str, identifier: &str, context: &str) -> AppError {
    warn!(
        context = %context,
        resource = %resource,
        identifier = %identifier,
        "Resource not found"
    );
    AppError::NotFound(format!(
        "{} with identifier {} not found",
        resource, identifier
    ))
}

// =============================================================================
// Result型のヘルパートレイト
// =============================================================================

pub trait ErrorHelperExt<T> {
    /// 内部サーバーエラーに変換
    fn map_internal_error(self, context: &str, user_message: &str) -> Result<T, AppError>;

    /// 外部サービスエラーに変換
    fn map_external_error(self, context: &str, user_message: &str) -> Result<T, AppError>;

    /// バリデーションエラーに変換
    fn map_validation_error(self, field: &str, message: &str) -> Result<T, AppError>;
}

impl<T, E> ErrorHelperExt<T> for Result<T, E>
where
    E: std::fmt::Display,
{
    fn map_internal_error(self, context: &str, user_message: &str) -> Result<T, AppError> {
        self.map_err(|e| internal_server_error(e, context, user_message))
    }

    fn map_external_error(self, context: &str, user_message: &str) -> Result<T, AppError> {
        self.map_err(|e| external_service_error(e, context, user_message))
    }

    fn map_validation_error(self, field: &str, message: &str) -> Result<T, AppError> {
        self.map_err(|_| validation_error(field, message))
    }
}
