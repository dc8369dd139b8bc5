// src/repository/auth_repository.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::AuthRepository;
use crate::domain::admin_user_model::{self, Entity as AdminUserEntity};
use crate::domain::session_model::{self, Entity as SessionEntity};
use crate::domain::user_model::{self, Entity as UserEntity};

pub struct PgAuthRepository {
    db: DbConn,
}

impl PgAuthRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AuthRepository for PgAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
    }

    async fn find_user_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find_by_id(id).one(&self.db).await
    }

    async fn create_user(
        &self,
        email: &str,
        password_hash: &str,
    ) -> Result<user_model::Model, DbErr> {
        user_model::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.trim().to_lowercase()),
            password_hash: Set(password_hash.to_string()),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await
    }

    async fn is_admin(&self, user_id: Uuid) -> Result<bool, DbErr> {
        Ok(AdminUserEntity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .is_some())
    }

    async fn grant_admin(&self, user_id: Uuid) -> Result<(), DbErr> {
        if self.is_admin(user_id).await? {
            return Ok(());
        }

        admin_user_model::ActiveModel {
            id: Set(user_id),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;
        Ok(())
    }

    async fn create_session(
        &self,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<session_model::Model, DbErr> {
        session_model::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            created_at: Set(Utc::now()),
            expires_at: Set(expires_at),
            revoked_at: Set(None),
        }
        .insert(&self.db)
        .await
    }

    async fn find_session(&self, id: Uuid) -> Result<Option<session_model::Model>, DbErr> {
        SessionEntity::find_by_id(id).one(&self.db).await
    }

    async fn revoke_session(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, DbErr> {
        let result = SessionEntity::update_many()
            .col_expr(
                session_model::Column::RevokedAt,
                sea_orm::sea_query::Expr::value(Some(at)),
            )
            .filter(session_model::Column::Id.eq(id))
            .filter(session_model::Column::RevokedAt.is_null())
            .exec(&self.db)
            .await?;

        Ok(result.rows_affected > 0)
    }
}
