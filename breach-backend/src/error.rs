// src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::DbErr;
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Multiple validation errors")]
    ValidationErrors(Vec<String>),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl AppError {
    /// HTTPステータスコードを取得
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DbErr(DbErr::RecordNotFound(_)) => StatusCode::NOT_FOUND,
            AppError::DbErr(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_)
            | AppError::ValidationErrors(_)
            | AppError::ValidationFailure(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::ExternalServiceError(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// クライアントに返すエラー種別
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::DbErr(_) => "database_error",
            AppError::NotFound(_) => "not_found",
            AppError::ValidationError(_) => "validation_error",
            AppError::ValidationErrors(_) | AppError::ValidationFailure(_) => "validation_errors",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden(_) => "forbidden",
            AppError::InternalServerError(_) => "internal_server_error",
            AppError::ExternalServiceError(_) => "external_service_error",
        }
    }
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_type = self.error_type();

        let error_response = match self {
            AppError::DbErr(db_err) => {
                // サーバーログには詳細を出す
                tracing::error!(error = ?db_err, "Database error");

                let (message, details) = match &db_err {
                    DbErr::RecordNotFound(entity) => (
                        "The requested resource was not found",
                        Some(json!({ "entity": entity })),
                    ),
                    DbErr::Exec(_) => (
                        "A database operation failed",
                        Some(json!({ "operation": "exec" })),
                    ),
                    DbErr::Query(_) => (
                        "A database query failed",
                        Some(json!({ "operation": "query" })),
                    ),
                    _ => ("A database error occurred", None),
                };
                ErrorResponse::new(message, error_type).with_details(details)
            }
            AppError::ValidationErrors(errors) => {
                let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();
                for error in &errors {
                    if let Some((field, message)) = error.split_once(": ") {
                        field_errors
                            .entry(field.to_string())
                            .or_default()
                            .push(message.to_string());
                    }
                }
                ErrorResponse::new("Validation failed", error_type)
                    .with_field_errors(field_errors, errors)
            }
            AppError::ValidationFailure(errors) => {
                let field_errors: HashMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map_or_else(|| "Invalid value".to_string(), |m| m.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                let flat = field_errors
                    .iter()
                    .flat_map(|(field, messages)| {
                        messages.iter().map(move |msg| format!("{}: {}", field, msg))
                    })
                    .collect();
                ErrorResponse::new("Validation failed", error_type)
                    .with_field_errors(field_errors, flat)
            }
            AppError::InternalServerError(message) => {
                tracing::error!(message = %message, "Internal server error");
                ErrorResponse::new("An internal server error occurred", error_type)
            }
            AppError::ExternalServiceError(message) => {
                tracing::error!(message = %message, "External service error");
                let mut response = ErrorResponse::new("External service error", error_type);
                response.message = message;
                response
            }
            AppError::NotFound(message)
            | AppError::ValidationError(message)
            | AppError::BadRequest(message)
            | AppError::Unauthorized(message)
            | AppError::Forbidden(message) => ErrorResponse::new(message, error_type),
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<serde_json::Value>>,
    pub error_type: String,
}

impl ErrorResponse {
    fn new(message: impl Into<String>, error_type: &str) -> Self {
        let message = message.into();
        Self {
            success: false,
            error: message.clone(),
            message,
            details: None,
            validation_errors: None,
            errors: None,
            error_type: error_type.to_string(),
        }
    }

    fn with_details(mut self, details: Option<serde_json::Value>) -> Self {
        self.details = details;
        self
    }

    fn with_field_errors(
        mut self,
        field_errors: HashMap<String, Vec<String>>,
        flat: Vec<String>,
    ) -> Self {
        self.validation_errors = Some(field_errors);
        self.errors = Some(flat.iter().map(|e| json!({ "message": e })).collect());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Forbidden("x".into()).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::ExternalServiceError("x".into()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::DbErr(DbErr::RecordNotFound("data_breaches".into())).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::DbErr(DbErr::Custom("boom".into())).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_validation_errors_grouped_by_field() {
        let response = AppError::ValidationErrors(vec![
            "email: Invalid email".to_string(),
            "email: Email is required".to_string(),
            "phone: Invalid phone".to_string(),
        ])
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
