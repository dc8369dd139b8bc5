// src/service/search_service.rs

use std::sync::Arc;
use tracing::{debug, info};

use crate::domain::breach_filter::DateRange;
use crate::domain::breach_record::PublicBreachRecord;
use crate::error::AppResult;
use crate::repository::{BreachRecordRepository, SearchCriteria, SearchField};
use crate::utils::error_helper::{external_service_error, validation_error};

/// 公開検索サービス
pub struct SearchService {
    repo: Arc<dyn BreachRecordRepository>,
}

impl SearchService {
    pub fn new(repo: Arc<dyn BreachRecordRepository>) -> Self {
        Self { repo }
    }

    /// 承認済みレコードから最も新しい漏洩日の一致を1件返す
    ///
    /// クエリが空白のみの場合はレコードストアに問い合わせずに弾く。
    /// 一致なしは `Ok(None)`、ストア障害は ExternalServiceError として区別する。
    pub async fn search(
        &self,
        query: &str,
        field: SearchField,
        date_range: DateRange,
    ) -> AppResult<Option<PublicBreachRecord>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(validation_error("query", "Search query must not be empty"));
        }
        if date_range.is_inverted() {
            return Err(validation_error(
                "date_range",
                "Start date must not be after end date",
            ));
        }

        let criteria = SearchCriteria {
            field,
            query: query.to_string(),
            date_range,
        };

        let mut matches = self
            .repo
            .find_approved_matching(&criteria)
            .await
            .map_err(|e| {
                external_service_error(e, "search_service::search", "Record store is unavailable")
            })?;

        // 安定ソートで漏洩日の降順
        matches.sort_by(|a, b| b.breach_date.cmp(&a.breach_date));

        debug!(field = ?field, match_count = matches.len(), "Public search executed");

        let found = matches.first().map(PublicBreachRecord::from);
        if found.is_some() {
            info!(field = ?field, "Public search matched a record");
        }
        Ok(found)
    }
}
