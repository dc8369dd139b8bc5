// src/repository/memory.rs

//! インメモリ実装（テストとローカル確認用）

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DbErr;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AuthRepository, BreachRecordRepository, SearchCriteria};
use crate::domain::breach_record::{BreachRecord, BreachRecordChanges};
use crate::domain::breach_status::BreachStatus;
use crate::domain::{session_model, user_model};

#[derive(Default)]
pub struct InMemoryBreachRecordRepository {
    records: RwLock<Vec<BreachRecord>>,
    failing: AtomicBool,
    search_calls: AtomicUsize,
}

impl InMemoryBreachRecordRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<BreachRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            ..Self::default()
        }
    }

    /// trueにすると以降の呼び出しが接続エラーを返す
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// find_approved_matching が呼ばれた回数
    pub fn search_calls(&self) -> usize {
        self.search_calls.load(Ordering::SeqCst)
    }

    pub async fn snapshot(&self) -> Vec<BreachRecord> {
        self.records.read().await.clone()
    }

    fn check_available(&self) -> Result<(), DbErr> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DbErr::Conn(sea_orm::RuntimeErr::Internal(
                "record store unavailable".to_string(),
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BreachRecordRepository for InMemoryBreachRecordRepository {
    async fn find_approved_matching(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<BreachRecord>, DbErr> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut matched: Vec<BreachRecord> = self
            .records
            .read()
            .await
            .iter()
            .filter(|record| criteria.matches(record))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.breach_date.cmp(&a.breach_date));
        Ok(matched)
    }

    async fn find_all(&self) -> Result<Vec<BreachRecord>, DbErr> {
        self.check_available()?;
        let mut records = self.records.read().await.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<BreachRecord>, DbErr> {
        self.check_available()?;
        Ok(self
            .records
            .read()
            .await
            .iter()
            .find(|record| record.id == id)
            .cloned())
    }

    async fn insert(&self, record: BreachRecord) -> Result<BreachRecord, DbErr> {
        self.check_available()?;
        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: Uuid,
        changes: BreachRecordChanges,
    ) -> Result<Option<BreachRecord>, DbErr> {
        self.check_available()?;
        let mut records = self.records.write().await;
        Ok(records.iter_mut().find(|record| record.id == id).map(|record| {
            record.apply_changes(changes);
            record.clone()
        }))
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: BreachStatus,
    ) -> Result<Option<BreachRecord>, DbErr> {
        self.check_available()?;
        let mut records = self.records.write().await;
        Ok(records.iter_mut().find(|record| record.id == id).map(|record| {
            record.status = status;
            record.updated_at = Utc::now();
            record.clone()
        }))
    }

    async fn mark_removal_requested(
        &self,
        email: &str,
        phone: &str,
        at: DateTime<Utc>,
    ) -> Result<u64, DbErr> {
        self.check_available()?;
        let mut updated = 0;
        for record in self.records.write().await.iter_mut() {
            if record.email == email && record.phone == phone {
                record.mark_removal_requested(at);
                updated += 1;
            }
        }
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, DbErr> {
        self.check_available()?;
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| record.id != id);
        Ok(records.len() < before)
    }

    async fn delete_many(&self, ids: &[Uuid]) -> Result<u64, DbErr> {
        self.check_available()?;
        let targets: HashSet<&Uuid> = ids.iter().collect();
        let mut records = self.records.write().await;
        let before = records.len();
        records.retain(|record| !targets.contains(&record.id));
        Ok((before - records.len()) as u64)
    }
}

#[derive(Default)]
pub struct InMemoryAuthRepository {
    users: RwLock<Vec<user_model::Model>>,
    admins: RwLock<HashSet<Uuid>>,
    sessions: RwLock<Vec<session_model::Model>>,
}

impl InMemoryAuthRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AuthRepository for InMemoryAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr> {
        let email = email.trim().to_lowercase();
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|user| user.id == id)
            .cloned())
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<user_model::Model, DbErr> {
        let email = email.trim().to_lowercase();
        let mut users = self.users.write().await;
        if users.iter().any(|user| user.email == email) {
            return Err(DbErr::Custom(format!("user {} already exists", email)));
        }

        let user = user_model::Model {
            id: Uuid::new_v4(),
            email,
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn is_admin(&self, user_id: Uuid) -> Result<bool, DbErr> {
        Ok(self.admins.read().await.contains(&user_id))
    }

    async fn grant_admin(&self, user_id: Uuid) -> Result<(), DbErr> {
        self.admins.write().await.insert(user_id);
        Ok(())
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<session_model::Model, DbErr> {
        let session = session_model::Model {
            id: Uuid::new_v4(),
            user_id,
            created_at: Utc::now(),
            expires_at,
            revoked_at: None,
        };
        self.sessions.write().await.push(session.clone());
        Ok(session)
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<session_model::Model>, DbErr> {
        Ok(self
            .sessions
            .read()
            .await
            .iter()
            .find(|session| session.id == id)
            .cloned())
    }

    async fn revoke_session(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, DbErr> {
        let mut sessions = self.sessions.write().await;
        match sessions
            .iter_mut()
            .find(|session| session.id == id && session.revoked_at.is_none())
        {
            Some(session) => {
                session.revoked_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
