// src/domain/breach_filter.rs

//! 管理画面の一覧フィルタ
//!
//! 全件に対する純粋関数として評価する。状態・重大度・検索語・日付範囲は
//! すべてAND条件で、未指定の項目は制約なしとして扱う。

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::breach_record::BreachRecord;
use super::breach_status::BreachStatus;
use super::severity::Severity;

/// 漏洩日の範囲（両端を含む）
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        !matches!(self.start, Some(start) if date < start)
            && !matches!(self.end, Some(end) if date > end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// 開始日が終了日より後なら範囲として不正
    pub fn is_inverted(&self) -> bool {
        matches!((self.start, self.end), (Some(start), Some(end)) if start > end)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachFilter {
    pub status: Option<BreachStatus>,
    pub severity: Option<Severity>,
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub date_range: DateRange,
}

impl BreachFilter {
    pub fn matches(&self, record: &BreachRecord) -> bool {
        if self.status.is_some_and(|status| record.status != status) {
            return false;
        }

        if self.severity.is_some_and(|severity| record.severity != severity) {
            return false;
        }

        let term = self.search.trim();
        if !term.is_empty() && !record.matches_text(term) {
            return false;
        }

        self.date_range.contains(record.breach_date)
    }

    /// 元の並び順を保ったまま条件に合うレコードを返す
    pub fn apply<'a>(&self, records: &'a [BreachRecord]) -> Vec<&'a BreachRecord> {
        records.iter().filter(|record| self.matches(record)).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.severity.is_none()
            && self.search.trim().is_empty()
            && self.date_range.is_unbounded()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::breach_record::NewBreachRecord;

    fn record(
        name: &str,
        status: BreachStatus,
        severity: Severity,
        date: (i32, u32, u32),
    ) -> BreachRecord {
        let mut record = BreachRecord::from_new(NewBreachRecord {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: "555-0100".to_string(),
            breach_date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            breach_source: "Source".to_string(),
            severity,
            compromised_data: vec!["Email".to_string()],
            profile_picture: None,
            breach_documents: vec![],
        });
        record.status = status;
        record
    }

    fn fixture() -> Vec<BreachRecord> {
        vec![
            record("Alice", BreachStatus::Approved, Severity::High, (2023, 1, 10)),
            record("Bob", BreachStatus::Pending, Severity::High, (2023, 3, 5)),
            record("Carol", BreachStatus::Approved, Severity::Low, (2023, 6, 20)),
            record("Dave", BreachStatus::Rejected, Severity::High, (2024, 2, 1)),
            record("Erin", BreachStatus::Approved, Severity::High, (2024, 8, 15)),
        ]
    }

    fn names(records: Vec<&BreachRecord>) -> Vec<String> {
        records.into_iter().map(|r| r.name.clone()).collect()
    }

    #[test]
    fn test_empty_filter_returns_everything_in_order() {
        let records = fixture();
        let filter = BreachFilter::default();
        assert!(filter.is_empty());
        assert_eq!(
            names(filter.apply(&records)),
            vec!["Alice", "Bob", "Carol", "Dave", "Erin"]
        );
    }

    #[test]
    fn test_status_and_severity_preserve_order() {
        let records = fixture();
        let filter = BreachFilter {
            status: Some(BreachStatus::Approved),
            severity: Some(Severity::High),
            ..Default::default()
        };
        assert_eq!(names(filter.apply(&records)), vec!["Alice", "Erin"]);
    }

    #[test]
    fn test_search_is_conjunctive_with_other_filters() {
        let records = fixture();
        let filter = BreachFilter {
            status: Some(BreachStatus::Pending),
            search: "alice".to_string(),
            ..Default::default()
        };
        assert!(filter.apply(&records).is_empty());

        let filter = BreachFilter {
            search: "EXAMPLE.COM".to_string(),
            date_range: DateRange::new(NaiveDate::from_ymd_opt(2024, 1, 1), None),
            ..Default::default()
        };
        assert_eq!(names(filter.apply(&records)), vec!["Dave", "Erin"]);
    }

    #[test]
    fn test_date_range_is_inclusive() {
        let records = fixture();
        let filter = BreachFilter {
            date_range: DateRange::new(
                NaiveDate::from_ymd_opt(2023, 3, 5),
                NaiveDate::from_ymd_opt(2023, 6, 20),
            ),
            ..Default::default()
        };
        assert_eq!(names(filter.apply(&records)), vec!["Bob", "Carol"]);
    }

    #[test]
    fn test_whitespace_search_is_no_constraint() {
        let records = fixture();
        let filter = BreachFilter {
            search: "   ".to_string(),
            ..Default::default()
        };
        assert_eq!(filter.apply(&records).len(), records.len());
    }

    #[test]
    fn test_inverted_range() {
        let range = DateRange::new(
            NaiveDate::from_ymd_opt(2024, 1, 1),
            NaiveDate::from_ymd_opt(2023, 1, 1),
        );
        assert!(range.is_inverted());
        assert!(!DateRange::default().is_inverted());
    }
}
