// src/api/dto/breach_dto.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::domain::breach_filter::{BreachFilter, DateRange};
use crate::domain::breach_record::{
    normalize_compromised_data, parse_compromised_data, BreachRecord, BreachRecordChanges,
    NewBreachRecord,
};
use crate::domain::breach_status::BreachStatus;
use crate::domain::display::{severity_label, severity_tone, status_label, status_tone, DisplayTone};
use crate::domain::severity::Severity;
use crate::error::{AppError, AppResult};
use crate::service::admin_service::{BulkDeleteRequest, BulkDeleteResult};
use crate::utils::error_helper::validation_error;
use crate::utils::validation::{text, validate_not_blank};

// --- クエリDTO ---

/// 一覧フィルタ。空文字は「指定なし」として扱う
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BreachListQuery {
    pub status: Option<String>,
    pub severity: Option<String>,
    pub search: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
}

impl BreachListQuery {
    pub fn into_filter(self) -> AppResult<BreachFilter> {
        let status = non_empty(self.status)
            .map(|s| s.parse::<BreachStatus>().map_err(|e| validation_error("status", &e)))
            .transpose()?;
        let severity = non_empty(self.severity)
            .map(|s| s.parse::<Severity>().map_err(|e| validation_error("severity", &e)))
            .transpose()?;

        Ok(BreachFilter {
            status,
            severity,
            search: self.search.unwrap_or_default(),
            date_range: DateRange::new(
                parse_optional_date("start", self.start)?,
                parse_optional_date("end", self.end)?,
            ),
        })
    }
}

// --- リクエストDTO ---

/// 漏洩項目は配列でもカンマ区切り文字列でも受け付ける
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum CompromisedDataInput {
    List(Vec<String>),
    Text(String),
}

impl CompromisedDataInput {
    pub fn into_items(self) -> Vec<String> {
        match self {
            Self::List(items) => normalize_compromised_data(items),
            Self::Text(raw) => parse_compromised_data(&raw),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateStatusRequest {
    #[validate(length(min = 1, message = "Status is required"))]
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn parse_status(&self) -> AppResult<BreachStatus> {
        self.status
            .parse::<BreachStatus>()
            .map_err(|e| validation_error("status", &e))
    }
}

/// 全項目編集
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateBreachRecordRequest {
    #[validate(
        length(min = text::MIN_LENGTH, max = text::MAX_LENGTH, message = "Name must be between 1 and 255 characters"),
        custom(function = validate_not_blank)
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = text::MIN_LENGTH, max = text::MAX_LENGTH, message = "Phone must be between 1 and 255 characters"),
        custom(function = validate_not_blank)
    )]
    pub phone: String,

    pub breach_date: NaiveDate,

    #[validate(
        length(min = text::MIN_LENGTH, max = text::MAX_LENGTH, message = "Breach source must be between 1 and 255 characters"),
        custom(function = validate_not_blank)
    )]
    pub breach_source: String,

    pub severity: String,

    pub compromised_data: CompromisedDataInput,

    pub status: String,
}

impl UpdateBreachRecordRequest {
    pub fn into_changes(self) -> AppResult<BreachRecordChanges> {
        let severity = self
            .severity
            .parse::<Severity>()
            .map_err(|e| validation_error("severity", &e))?;
        let status = self
            .status
            .parse::<BreachStatus>()
            .map_err(|e| validation_error("status", &e))?;

        Ok(BreachRecordChanges {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            breach_date: self.breach_date,
            breach_source: self.breach_source.trim().to_string(),
            severity,
            compromised_data: self.compromised_data.into_items(),
            status,
        })
    }
}

/// multipartのテキスト項目から組み立てる新規登録フォーム
#[derive(Debug, Clone, Default, Validate)]
pub struct CreateBreachRecordForm {
    #[validate(
        length(min = text::MIN_LENGTH, max = text::MAX_LENGTH, message = "Name must be between 1 and 255 characters"),
        custom(function = validate_not_blank)
    )]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = text::MIN_LENGTH, max = text::MAX_LENGTH, message = "Phone must be between 1 and 255 characters"),
        custom(function = validate_not_blank)
    )]
    pub phone: String,

    #[validate(length(min = 1, message = "Breach date is required"))]
    pub breach_date: String,

    #[validate(
        length(min = text::MIN_LENGTH, max = text::MAX_LENGTH, message = "Breach source must be between 1 and 255 characters"),
        custom(function = validate_not_blank)
    )]
    pub breach_source: String,

    pub severity: Option<String>,

    #[validate(length(min = 1, message = "Compromised data is required"))]
    pub compromised_data: String,
}

impl CreateBreachRecordForm {
    /// multipartのテキスト項目を1つ反映する。未知の項目名はfalse
    pub fn set_field(&mut self, name: &str, value: String) -> bool {
        match name {
            "name" => self.name = value,
            "email" => self.email = value,
            "phone" => self.phone = value,
            "breach_date" => self.breach_date = value,
            "breach_source" => self.breach_source = value,
            "severity" => self.severity = Some(value),
            "compromised_data" => self.compromised_data = value,
            _ => return false,
        }
        true
    }

    pub fn into_new_record(self) -> AppResult<NewBreachRecord> {
        let breach_date = parse_date("breach_date", &self.breach_date)?;
        let severity = non_empty(self.severity)
            .map(|s| s.parse::<Severity>().map_err(|e| validation_error("severity", &e)))
            .transpose()?
            .unwrap_or_default();

        Ok(NewBreachRecord {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            phone: self.phone.trim().to_string(),
            breach_date,
            breach_source: self.breach_source.trim().to_string(),
            severity,
            compromised_data: parse_compromised_data(&self.compromised_data),
            profile_picture: None,
            breach_documents: Vec::new(),
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BulkDeleteRequestDto {
    #[serde(default)]
    pub ids: Vec<Uuid>,
    #[serde(default)]
    pub select_all: bool,
    /// 表示中の一覧を決めたフィルタ
    #[serde(default)]
    pub filter: BreachListQuery,
}

impl BulkDeleteRequestDto {
    pub fn into_request(self) -> AppResult<BulkDeleteRequest> {
        if !self.select_all && self.ids.is_empty() {
            return Err(AppError::BadRequest(
                "Either ids or select_all must be provided".to_string(),
            ));
        }

        Ok(BulkDeleteRequest {
            ids: self.ids,
            select_all: self.select_all,
            filter: self.filter.into_filter()?,
        })
    }
}

// --- レスポンスDTO ---

/// 管理画面用のレコード（表示トーン付き）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreachRecordDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub breach_date: NaiveDate,
    pub breach_source: String,
    pub severity: Severity,
    pub severity_label: String,
    pub severity_tone: DisplayTone,
    pub compromised_data: Vec<String>,
    pub status: BreachStatus,
    pub status_label: String,
    pub status_tone: DisplayTone,
    pub removal_requested: bool,
    pub request_date: Option<DateTime<Utc>>,
    pub profile_picture: Option<String>,
    pub breach_documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<BreachRecord> for BreachRecordDto {
    fn from(record: BreachRecord) -> Self {
        Self {
            id: record.id,
            severity_label: severity_label(record.severity.as_str()),
            severity_tone: severity_tone(record.severity.as_str()),
            status_label: status_label(record.status.as_str()),
            status_tone: status_tone(record.status.as_str()),
            name: record.name,
            email: record.email,
            phone: record.phone,
            breach_date: record.breach_date,
            breach_source: record.breach_source,
            severity: record.severity,
            compromised_data: record.compromised_data,
            status: record.status,
            removal_requested: record.removal_requested,
            request_date: record.request_date,
            profile_picture: record.profile_picture,
            breach_documents: record.breach_documents,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkDeleteResponse {
    pub deleted_count: u64,
    pub deleted_ids: Vec<Uuid>,
}

impl From<BulkDeleteResult> for BulkDeleteResponse {
    fn from(result: BulkDeleteResult) -> Self {
        Self {
            deleted_count: result.deleted_count,
            deleted_ids: result.deleted_ids,
        }
    }
}

// --- ヘルパー関数 ---

pub(crate) fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| validation_error(field, "Date must be in YYYY-MM-DD format"))
}

pub(crate) fn parse_optional_date(field: &str, value: Option<String>) -> AppResult<Option<NaiveDate>> {
    non_empty(value).map(|v| parse_date(field, &v)).transpose()
}
