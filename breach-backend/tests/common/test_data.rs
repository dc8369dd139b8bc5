// tests/common/test_data.rs

use breach_backend::domain::breach_record::{BreachRecord, NewBreachRecord};
use breach_backend::domain::breach_status::BreachStatus;
use breach_backend::domain::severity::Severity;
use chrono::{Duration, NaiveDate, TimeZone, Utc};

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 漏洩レコードを生成
pub fn breach_record(
    name: &str,
    email: &str,
    phone: &str,
    breach_date: NaiveDate,
    status: BreachStatus,
    severity: Severity,
) -> BreachRecord {
    let mut record = BreachRecord::from_new(NewBreachRecord {
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        breach_date,
        breach_source: "ExampleCorp".to_string(),
        severity,
        compromised_data: vec!["Email".to_string(), "Password".to_string()],
        profile_picture: None,
        breach_documents: vec![],
    });
    record.status = status;
    record
}

/// 管理画面の絞り込み用の5件
///
/// created_at は配列の後ろほど新しいので、一覧（作成日時の降順）は逆順になる。
pub fn admin_fixture() -> Vec<BreachRecord> {
    let base = Utc.with_ymd_and_hms(2024, 9, 1, 0, 0, 0).unwrap();

    let records = vec![
        breach_record(
            "Alice",
            "alice@example.com",
            "555-0101",
            date(2023, 1, 10),
            BreachStatus::Approved,
            Severity::High,
        ),
        breach_record(
            "Bob",
            "bob@example.com",
            "555-0102",
            date(2023, 3, 5),
            BreachStatus::Pending,
            Severity::High,
        ),
        breach_record(
            "Carol",
            "carol@example.com",
            "555-0103",
            date(2023, 6, 20),
            BreachStatus::Approved,
            Severity::Low,
        ),
        breach_record(
            "Dave",
            "dave@example.com",
            "555-0104",
            date(2024, 2, 1),
            BreachStatus::Rejected,
            Severity::High,
        ),
        breach_record(
            "Erin",
            "erin@example.com",
            "555-0105",
            date(2024, 8, 15),
            BreachStatus::Approved,
            Severity::High,
        ),
    ];

    records
        .into_iter()
        .enumerate()
        .map(|(i, mut record)| {
            record.created_at = base + Duration::minutes(i as i64);
            record.updated_at = record.created_at;
            record
        })
        .collect()
}

/// 同じ人物の複数の漏洩（公開検索の並び順確認用）
pub fn search_fixture() -> Vec<BreachRecord> {
    vec![
        breach_record(
            "Jane Doe",
            "jane@example.com",
            "+1 555 0100",
            date(2022, 5, 1),
            BreachStatus::Approved,
            Severity::Medium,
        ),
        breach_record(
            "Jane Doe",
            "jane@example.com",
            "+1 555 0100",
            date(2023, 11, 20),
            BreachStatus::Approved,
            Severity::High,
        ),
        breach_record(
            "Jane Doe",
            "jane@example.com",
            "+1 555 0100",
            date(2024, 4, 2),
            BreachStatus::Pending,
            Severity::High,
        ),
        breach_record(
            "John 100%_Smith",
            "john@example.com",
            "+44 20 7946 0000",
            date(2021, 7, 7),
            BreachStatus::Approved,
            Severity::Low,
        ),
        breach_record(
            "Johnny Rejected",
            "johnny@example.com",
            "+44 20 7946 0001",
            date(2024, 1, 1),
            BreachStatus::Rejected,
            Severity::Low,
        ),
    ]
}

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const USER_EMAIL: &str = "user@example.com";
pub const TEST_PASSWORD: &str = "CorrectHorse42!";
