// src/repository/mod.rs

//! レコードストアへのアクセス境界
//!
//! サービス層はこのトレイト越しにのみ永続化層へ触れる。
//! PostgreSQL(SeaORM)実装とインメモリ実装を持つ。

pub mod auth_repository;
pub mod breach_record_repository;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::breach_filter::DateRange;
use crate::domain::breach_record::{BreachRecord, BreachRecordChanges};
use crate::domain::breach_status::BreachStatus;
use crate::domain::{session_model, user_model};

pub use auth_repository::PgAuthRepository;
pub use breach_record_repository::PgBreachRecordRepository;
pub use memory::{InMemoryAuthRepository, InMemoryBreachRecordRepository};

/// 公開検索で照合するフィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchField {
    Email,
    Phone,
    Name,
}

impl SearchField {
    pub fn value_of<'a>(&self, record: &'a BreachRecord) -> &'a str {
        match self {
            Self::Email => &record.email,
            Self::Phone => &record.phone,
            Self::Name => &record.name,
        }
    }
}

/// 公開検索の条件（queryはトリム済み・非空であること）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCriteria {
    pub field: SearchField,
    pub query: String,
    pub date_range: DateRange,
}

impl SearchCriteria {
    /// 承認済み・部分一致（大文字小文字無視）・日付範囲内
    pub fn matches(&self, record: &BreachRecord) -> bool {
        record.status.is_public()
            && self
                .field
                .value_of(record)
                .to_lowercase()
                .contains(&self.query.to_lowercase())
            && self.date_range.contains(record.breach_date)
    }
}

#[async_trait]
pub trait BreachRecordRepository: Send + Sync {
    /// 承認済みで条件に一致するレコード（漏洩日の降順）
    async fn find_approved_matching(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<BreachRecord>, DbErr>;

    /// 全件（作成日時の降順）
    async fn find_all(&self) -> Result<Vec<BreachRecord>, DbErr>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BreachRecord>, DbErr>;

    async fn insert(&self, record: BreachRecord) -> Result<BreachRecord, DbErr>;

    async fn update(
        &self,
        id: Uuid,
        changes: BreachRecordChanges,
    ) -> Result<Option<BreachRecord>, DbErr>;

    async fn update_status(
        &self,
        id: Uuid,
        status: BreachStatus,
    ) -> Result<Option<BreachRecord>, DbErr>;

    /// (email, phone) が完全一致する全レコードに削除依頼を記録し、更新件数を返す
    async fn mark_removal_requested(
        &self,
        email: &str,
        phone: &str,
        at: DateTime<Utc>,
    ) -> Result<u64, DbErr>;

    async fn delete(&self, id: Uuid) -> Result<bool, DbErr>;

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, DbErr>;
}

#[async_trait]
pub trait AuthRepository: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr>;

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr>;

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<user_model::Model, DbErr>;

    /// 許可リストに含まれるか
    async fn is_admin(&self, user_id: Uuid) -> Result<bool, DbErr>;

    async fn grant_admin(&self, user_id: Uuid) -> Result<(), DbErr>;

    async fn create_session(
        &self,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<session_model::Model, DbErr>;

    async fn find_session(&self, id: Uuid) -> Result<Option<session_model::Model>, DbErr>;

    /// 未失効のセッションを失効させる。失効させた場合true
    async fn revoke_session(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, DbErr>;
}

/// LIKE のワイルドカードをエスケープし、部分一致パターンを作る
pub(crate) fn contains_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}
