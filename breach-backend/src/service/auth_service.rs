// src/service/auth_service.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::AppResult;
use crate::repository::AuthRepository;
use crate::utils::error_helper::{forbidden_error, internal_server_error, unauthorized_error};
use crate::utils::jwt::{JwtError, JwtManager};
use crate::utils::password::PasswordManager;

const SESSION_EVENT_CAPACITY: usize = 64;

/// セッションの状態変化（プロセス内で購読できる）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { user_id: Uuid, session_id: Uuid },
    SignedOut { user_id: Uuid, session_id: Uuid },
    /// 許可リストにないユーザーを強制的にサインアウトさせた
    ForcedSignOut { user_id: Uuid, session_id: Uuid },
}

/// リクエストごとに取り出す有効なセッション
#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub session_id: Uuid,
    pub user_id: Uuid,
    pub email: String,
    pub is_admin: bool,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct SignInResult {
    pub access_token: String,
    pub session: SessionInfo,
}

/// 認証サービス
pub struct AuthService {
    repo: Arc<dyn AuthRepository>,
    password_manager: Arc<PasswordManager>,
    jwt_manager: Arc<JwtManager>,
    events: broadcast::Sender<SessionEvent>,
}

impl AuthService {
    pub fn new(
        repo: Arc<dyn AuthRepository>,
        password_manager: Arc<PasswordManager>,
        jwt_manager: Arc<JwtManager>,
    ) -> Self {
        let (events, _) = broadcast::channel(SESSION_EVENT_CAPACITY);
        Self {
            repo,
            password_manager,
            jwt_manager,
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn publish(&self, event: SessionEvent) {
        // 購読者がいなければ送信エラーになるが無視してよい
        if self.events.send(event).is_err() {
            debug!("No session event subscribers");
        }
    }

    /// メールアドレスとパスワードでサインイン
    pub async fn sign_in(&self, email: &str, password: &str) -> AppResult<SignInResult> {
        let user = self
            .repo
            .find_user_by_email(email)
            .await?
            .ok_or_else(|| unauthorized_error("Invalid email or password", "auth_service::sign_in"))?;

        let valid = self
            .password_manager
            .verify_password(password, &user.password_hash)
            .map_err(|e| {
                internal_server_error(e, "auth_service::sign_in", "Failed to verify credentials")
            })?;
        if !valid {
            return Err(unauthorized_error(
                "Invalid email or password",
                "auth_service::sign_in",
            ));
        }

        let expires_at = Utc::now() + self.jwt_manager.config().access_token_ttl();
        let session = self.repo.create_session(user.id, expires_at).await?;
        let access_token = self
            .jwt_manager
            .generate_access_token(user.id, session.id, session.expires_at)
            .map_err(|e| {
                internal_server_error(e, "auth_service::sign_in", "Failed to issue access token")
            })?;
        let is_admin = self.repo.is_admin(user.id).await?;

        info!(user_id = %user.id, session_id = %session.id, is_admin, "User signed in");
        self.publish(SessionEvent::SignedIn {
            user_id: user.id,
            session_id: session.id,
        });

        Ok(SignInResult {
            access_token,
            session: SessionInfo {
                session_id: session.id,
                user_id: user.id,
                email: user.email,
                is_admin,
                expires_at: session.expires_at,
            },
        })
    }

    /// トークンから有効なセッションを取り出す（失効・期限切れは401）
    pub async fn current_session(&self, token: &str) -> AppResult<SessionInfo> {
        const CONTEXT: &str = "auth_service::current_session";

        let claims = self.jwt_manager.verify_access_token(token).map_err(|e| match e {
            JwtError::TokenExpired => unauthorized_error("Session has expired", CONTEXT),
            _ => unauthorized_error("Invalid access token", CONTEXT),
        })?;
        let user_id = claims
            .user_id()
            .map_err(|_| unauthorized_error("Invalid access token", CONTEXT))?;
        let session_id = claims
            .session_id()
            .map_err(|_| unauthorized_error("Invalid access token", CONTEXT))?;

        let session = self
            .repo
            .find_session(session_id)
            .await?
            .filter(|session| session.user_id == user_id && session.is_active_at(Utc::now()))
            .ok_or_else(|| unauthorized_error("Session is no longer active", CONTEXT))?;

        let user = self
            .repo
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| unauthorized_error("Session is no longer active", CONTEXT))?;
        let is_admin = self.repo.is_admin(user_id).await?;

        Ok(SessionInfo {
            session_id: session.id,
            user_id,
            email: user.email,
            is_admin,
            expires_at: session.expires_at,
        })
    }

    pub async fn sign_out(&self, session: &SessionInfo) -> AppResult<()> {
        if self.repo.revoke_session(session.session_id, Utc::now()).await? {
            info!(user_id = %session.user_id, session_id = %session.session_id, "User signed out");
            self.publish(SessionEvent::SignedOut {
                user_id: session.user_id,
                session_id: session.session_id,
            });
        }
        Ok(())
    }

    /// 管理者チェック。許可リストにないセッションは失効させて403を返す
    pub async fn authorize_admin(&self, token: &str) -> AppResult<SessionInfo> {
        let session = self.current_session(token).await?;
        if session.is_admin {
            return Ok(session);
        }

        self.repo
            .revoke_session(session.session_id, Utc::now())
            .await?;
        warn!(
            user_id = %session.user_id,
            session_id = %session.session_id,
            "Non-admin session revoked"
        );
        self.publish(SessionEvent::ForcedSignOut {
            user_id: session.user_id,
            session_id: session.session_id,
        });

        Err(forbidden_error(
            "Administrator access required",
            "auth_service::authorize_admin",
            Some(&session.user_id.to_string()),
        ))
    }
}
