// src/domain/breach_record.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::breach_status::BreachStatus;
use super::severity::Severity;

/// 漏洩レコード（本人情報と漏洩イベントのメタデータ）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub breach_date: NaiveDate,
    pub breach_source: String,
    pub severity: Severity,
    pub compromised_data: Vec<String>,
    pub status: BreachStatus,
    pub removal_requested: bool,
    pub request_date: Option<DateTime<Utc>>,
    pub profile_picture: Option<String>,
    pub breach_documents: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BreachRecord {
    /// 新規レコードを組み立てる。状態は常にpending、削除依頼は常にfalse
    pub fn from_new(new: NewBreachRecord) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            email: new.email,
            phone: new.phone,
            breach_date: new.breach_date,
            breach_source: new.breach_source,
            severity: new.severity,
            compromised_data: new.compromised_data,
            status: BreachStatus::Pending,
            removal_requested: false,
            request_date: None,
            profile_picture: new.profile_picture,
            breach_documents: new.breach_documents,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply_changes(&mut self, changes: BreachRecordChanges) {
        self.name = changes.name;
        self.email = changes.email;
        self.phone = changes.phone;
        self.breach_date = changes.breach_date;
        self.breach_source = changes.breach_source;
        self.severity = changes.severity;
        self.compromised_data = changes.compromised_data;
        self.status = changes.status;
        self.updated_at = Utc::now();
    }

    /// 削除依頼を記録する（何度呼んでも日時が更新される）
    pub fn mark_removal_requested(&mut self, at: DateTime<Utc>) {
        self.removal_requested = true;
        self.request_date = Some(at);
        self.updated_at = at;
    }

    /// 氏名・メール・電話のいずれかに大文字小文字を無視して部分一致するか
    pub fn matches_text(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [&self.name, &self.email, &self.phone]
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// 管理画面からの新規登録内容
#[derive(Debug, Clone)]
pub struct NewBreachRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub breach_date: NaiveDate,
    pub breach_source: String,
    pub severity: Severity,
    pub compromised_data: Vec<String>,
    pub profile_picture: Option<String>,
    pub breach_documents: Vec<String>,
}

/// 管理画面からの全項目編集
#[derive(Debug, Clone)]
pub struct BreachRecordChanges {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub breach_date: NaiveDate,
    pub breach_source: String,
    pub severity: Severity,
    pub compromised_data: Vec<String>,
    pub status: BreachStatus,
}

/// 公開検索で返す項目のみの射影
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicBreachRecord {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub breach_date: NaiveDate,
    pub breach_source: String,
    pub compromised_data: Vec<String>,
    pub severity: Severity,
    pub profile_picture: Option<String>,
    pub breach_documents: Vec<String>,
}

impl From<&BreachRecord> for PublicBreachRecord {
    fn from(record: &BreachRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            breach_date: record.breach_date,
            breach_source: record.breach_source.clone(),
            compromised_data: record.compromised_data.clone(),
            severity: record.severity,
            profile_picture: record.profile_picture.clone(),
            breach_documents: record.breach_documents.clone(),
        }
    }
}

/// カンマ区切りの入力を漏洩項目リストに変換する
pub fn parse_compromised_data(raw: &str) -> Vec<String> {
    normalize_compromised_data(raw.split(',').map(str::to_string))
}

/// 前後空白を除去し、空要素と重複（先勝ち）を落とす。順序は保持
pub fn normalize_compromised_data<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut result: Vec<String> = Vec::new();
    for item in items {
        let trimmed = item.trim();
        if trimmed.is_empty() || result.iter().any(|existing| existing == trimmed) {
            continue;
        }
        result.push(trimmed.to_string());
    }
    result
}
