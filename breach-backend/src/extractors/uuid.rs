// src/extractors/uuid.rs

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

use crate::error::AppError;

/// レコードIDのパスパラメータ
///
/// 形式が不正な場合はaxum標準の文字列ではなくJSONの400を返す。
#[derive(Debug, Clone, Copy)]
pub struct RecordId(pub Uuid);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| AppError::BadRequest(format!("Missing path parameter 'id': {}", e)))?;

        parse_record_id(&raw).map(RecordId)
    }
}

pub fn parse_record_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid UUID format for 'id': '{}'", raw)))
}
