// src/api/dto/search_dto.rs

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::api::dto::breach_dto::parse_optional_date;
use crate::domain::breach_filter::DateRange;
use crate::domain::breach_record::PublicBreachRecord;
use crate::error::AppResult;
use crate::repository::SearchField;
use crate::utils::validation::query;

// --- リクエストDTO ---

/// 公開検索リクエスト（空白のみのクエリはサービス層で弾く）
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(
        max = query::MAX_LENGTH,
        message = "Search query must not exceed 255 characters"
    ))]
    pub query: String,

    pub search_type: SearchField,

    #[serde(default)]
    pub date_range: SearchDateRange,
}

/// 検索期間（空文字・null は未指定として扱う）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchDateRange {
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl SearchDateRange {
    pub fn into_date_range(self) -> AppResult<DateRange> {
        Ok(DateRange::new(
            parse_optional_date("date_range.start", self.start)?,
            parse_optional_date("date_range.end", self.end)?,
        ))
    }
}

/// 削除依頼の完了通知（検索で取得したレコードの email / phone）
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CompleteRemovalRequest {
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,

    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
}

// --- レスポンスDTO ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<PublicBreachRecord>,
}

impl From<Option<PublicBreachRecord>> for SearchResponse {
    fn from(found: Option<PublicBreachRecord>) -> Self {
        Self {
            found: found.is_some(),
            data: found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_defaults_date_range() {
        let request: SearchRequest =
            serde_json::from_str(r#"{"query":"jane","search_type":"name"}"#).unwrap();
        assert_eq!(request.search_type, SearchField::Name);
        assert!(request.date_range.into_date_range().unwrap().is_unbounded());
    }

    #[test]
    fn test_empty_date_strings_mean_no_constraint() {
        let request: SearchRequest = serde_json::from_str(
            r#"{"query":"jane","search_type":"name","date_range":{"start":"","end":" "}}"#,
        )
        .unwrap();
        assert!(request.date_range.into_date_range().unwrap().is_unbounded());
    }

    #[test]
    fn test_malformed_date_is_validation_error() {
        let range = SearchDateRange {
            start: Some("2024/01/01".to_string()),
            end: None,
        };
        assert!(range.into_date_range().is_err());
    }

    #[test]
    fn test_not_found_response_has_no_data() {
        let json = serde_json::to_value(SearchResponse::from(None)).unwrap();
        assert_eq!(json, serde_json::json!({ "found": false }));
    }
}
