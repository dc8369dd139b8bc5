// tests/repository_pg_test.rs
//
// Dockerが必要なため通常は無視される: cargo test -- --ignored

mod common;

use breach_backend::domain::breach_filter::DateRange;
use breach_backend::domain::breach_status::BreachStatus;
use breach_backend::repository::{
    AuthRepository, BreachRecordRepository, SearchCriteria, SearchField,
};
use chrono::{Duration, Utc};

use common::{db::TestDatabase, test_data};

#[tokio::test]
#[ignore]
async fn test_pg_search_filters_status_and_escapes_wildcards() {
    let db = TestDatabase::new().await;
    let repo = db.breach_repo();
    for record in test_data::search_fixture() {
        repo.insert(record).await.unwrap();
    }

    let jane = repo
        .find_approved_matching(&SearchCriteria {
            field: SearchField::Email,
            query: "JANE@".to_string(),
            date_range: DateRange::default(),
        })
        .await
        .unwrap();
    assert_eq!(jane.len(), 2);
    assert!(jane.iter().all(|r| r.status == BreachStatus::Approved));

    // `%` と `_` はリテラルとして扱われる
    let literal = repo
        .find_approved_matching(&SearchCriteria {
            field: SearchField::Name,
            query: "0%_s".to_string(),
            date_range: DateRange::default(),
        })
        .await
        .unwrap();
    assert_eq!(literal.len(), 1);

    let wildcard_only = repo
        .find_approved_matching(&SearchCriteria {
            field: SearchField::Name,
            query: "J_n".to_string(),
            date_range: DateRange::default(),
        })
        .await
        .unwrap();
    assert!(wildcard_only.is_empty());

    let ranged = repo
        .find_approved_matching(&SearchCriteria {
            field: SearchField::Name,
            query: "jane".to_string(),
            date_range: DateRange::new(Some(test_data::date(2023, 1, 1)), None),
        })
        .await
        .unwrap();
    assert_eq!(ranged.len(), 1);
    assert_eq!(ranged[0].breach_date, test_data::date(2023, 11, 20));
}

#[tokio::test]
#[ignore]
async fn test_pg_record_lifecycle() {
    let db = TestDatabase::new().await;
    let repo = db.breach_repo();

    let fixture = test_data::admin_fixture();
    for record in fixture.clone() {
        repo.insert(record).await.unwrap();
    }

    let all = repo.find_all().await.unwrap();
    let names: Vec<&str> = all.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Erin", "Dave", "Carol", "Bob", "Alice"]);
    assert_eq!(all[0].compromised_data, vec!["Email", "Password"]);

    let bob = &fixture[1];
    let approved = repo
        .update_status(bob.id, BreachStatus::Approved)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(approved.status, BreachStatus::Approved);

    let updated = repo
        .mark_removal_requested(&bob.email, &bob.phone, Utc::now())
        .await
        .unwrap();
    assert_eq!(updated, 1);
    let bob_after = repo.find_by_id(bob.id).await.unwrap().unwrap();
    assert!(bob_after.removal_requested);
    assert!(bob_after.request_date.is_some());

    assert!(repo.delete(fixture[0].id).await.unwrap());
    assert!(!repo.delete(fixture[0].id).await.unwrap());

    let deleted = repo
        .delete_many(&[fixture[2].id, fixture[3].id])
        .await
        .unwrap();
    assert_eq!(deleted, 2);
    assert_eq!(repo.find_all().await.unwrap().len(), 2);
}

#[tokio::test]
#[ignore]
async fn test_pg_sessions_and_allow_list() {
    let db = TestDatabase::new().await;
    let repo = db.auth_repo();

    let user = repo
        .create_user("Admin@Example.com", "hash")
        .await
        .unwrap();
    assert_eq!(user.email, "admin@example.com");
    assert!(repo
        .find_user_by_email("ADMIN@example.com")
        .await
        .unwrap()
        .is_some());

    assert!(!repo.is_admin(user.id).await.unwrap());
    repo.grant_admin(user.id).await.unwrap();
    repo.grant_admin(user.id).await.unwrap();
    assert!(repo.is_admin(user.id).await.unwrap());

    let session = repo
        .create_session(user.id, Utc::now() + Duration::hours(1))
        .await
        .unwrap();
    assert!(session.is_active_at(Utc::now()));

    assert!(repo.revoke_session(session.id, Utc::now()).await.unwrap());
    assert!(!repo.revoke_session(session.id, Utc::now()).await.unwrap());
    let revoked = repo.find_session(session.id).await.unwrap().unwrap();
    assert!(!revoked.is_active_at(Utc::now()));
}
